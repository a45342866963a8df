//! Declaration records made inside an analysis class body.
//!
//! Each record only says "this name was declared here, with these
//! properties". Whether a name is new, replaces an ancestor's declaration,
//! or reuses one is decided by the override resolver.

use std::sync::Arc;

use lineage_foundation::{
    CheckSalience, ClassId, ColumnSalience, ParameterSalience, RowFrequency, Type, Value,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::condition::Condition;
use crate::method::MethodArg;

// =============================================================================
// Column Declaration
// =============================================================================

/// A fresh column declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct ColumnDecl {
    /// Column name.
    pub name: Arc<str>,
    /// Stored type, usually a file format.
    pub ty: Type,
    /// Human-readable description.
    pub desc: Arc<str>,
    /// Row frequency; the analysis space's leaf level when `None`.
    pub row_frequency: Option<RowFrequency>,
    /// Importance tier.
    pub salience: ColumnSalience,
}

impl ColumnDecl {
    /// Creates a supplementary column at the space's leaf frequency.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, ty: Type, desc: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            ty,
            desc: desc.into(),
            row_frequency: None,
            salience: ColumnSalience::default(),
        }
    }

    /// Sets the salience tier.
    #[must_use]
    pub fn salience(mut self, salience: ColumnSalience) -> Self {
        self.salience = salience;
        self
    }

    /// Sets an explicit row frequency.
    #[must_use]
    pub fn row_frequency(mut self, frequency: RowFrequency) -> Self {
        self.row_frequency = Some(frequency);
        self
    }
}

// =============================================================================
// Parameter Declaration
// =============================================================================

/// A fresh parameter declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterDecl {
    /// Parameter name.
    pub name: Arc<str>,
    /// Value type.
    pub ty: Type,
    /// Human-readable description.
    pub desc: Arc<str>,
    /// Default value; `None` means the parameter has no default.
    pub default: Option<Value>,
    /// Importance tier.
    pub salience: ParameterSalience,
    /// Finite set of allowed values, if restricted.
    pub choices: Option<Vec<Value>>,
}

impl ParameterDecl {
    /// Creates a recommended parameter with no default.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, ty: Type, desc: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            ty,
            desc: desc.into(),
            default: None,
            salience: ParameterSalience::default(),
            choices: None,
        }
    }

    /// Sets the default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.default = Some(value.into());
        self
    }

    /// Sets the salience tier.
    #[must_use]
    pub fn salience(mut self, salience: ParameterSalience) -> Self {
        self.salience = salience;
        self
    }

    /// Restricts the parameter to a finite set of values.
    #[must_use]
    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.choices = Some(choices.into_iter().map(Into::into).collect());
        self
    }
}

// =============================================================================
// Inherit Marker
// =============================================================================

/// A field replaced by an inherit marker.
#[derive(Clone, Debug, PartialEq)]
pub enum Override {
    /// New default value (parameters only).
    Default(Value),
    /// New description.
    Description(Arc<str>),
    /// New salience tier (columns only).
    ColumnSalience(ColumnSalience),
    /// New salience tier (parameters only).
    ParameterSalience(ParameterSalience),
    /// New choice set (parameters only).
    Choices(Vec<Value>),
}

impl Override {
    /// Returns the name of the overridden field.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::Default(_) => "default",
            Self::Description(_) => "desc",
            Self::ColumnSalience(_) | Self::ParameterSalience(_) => "salience",
            Self::Choices(_) => "choices",
        }
    }
}

/// "Reuse the declaration of `name` visible in `from`'s resolved spec."
///
/// Without overrides the inherited declaration is reused verbatim. With
/// overrides, a copy with those fields replaced takes effect. Either way
/// the declaration stays owned by the class that authored it.
#[derive(Clone, Debug, PartialEq)]
pub struct InheritDecl {
    /// The inherited name.
    pub name: Arc<str>,
    /// The base class whose resolved spec holds the declaration.
    pub from: ClassId,
    /// A restated type; must equal the inherited one.
    pub ty: Option<Type>,
    /// Fields replaced in the inherited copy.
    pub overrides: Vec<Override>,
}

impl InheritDecl {
    /// Creates a verbatim inherit marker.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, from: ClassId) -> Self {
        Self {
            name: name.into(),
            from,
            ty: None,
            overrides: Vec::new(),
        }
    }

    /// Restates the inherited type.
    #[must_use]
    pub fn typed(mut self, ty: Type) -> Self {
        self.ty = Some(ty);
        self
    }

    /// Overrides the default value.
    #[must_use]
    pub fn default(mut self, value: impl Into<Value>) -> Self {
        self.overrides.push(Override::Default(value.into()));
        self
    }

    /// Overrides the description.
    #[must_use]
    pub fn desc(mut self, desc: impl Into<Arc<str>>) -> Self {
        self.overrides.push(Override::Description(desc.into()));
        self
    }

    /// Overrides a column's salience.
    #[must_use]
    pub fn column_salience(mut self, salience: ColumnSalience) -> Self {
        self.overrides.push(Override::ColumnSalience(salience));
        self
    }

    /// Overrides a parameter's salience.
    #[must_use]
    pub fn parameter_salience(mut self, salience: ParameterSalience) -> Self {
        self.overrides.push(Override::ParameterSalience(salience));
        self
    }

    /// Overrides a parameter's choice set.
    #[must_use]
    pub fn choices<I, V>(mut self, choices: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.overrides
            .push(Override::Choices(choices.into_iter().map(Into::into).collect()));
        self
    }

    /// Returns true if no field is overridden.
    #[must_use]
    pub fn is_verbatim(&self) -> bool {
        self.overrides.is_empty()
    }
}

/// Shorthand for [`InheritDecl::new`].
#[must_use]
pub fn inherited_from(name: impl Into<Arc<str>>, from: &ClassId) -> InheritDecl {
    InheritDecl::new(name, from.clone())
}

/// A data attribute declared in a class body.
#[derive(Clone, Debug, PartialEq)]
pub enum AttributeDecl {
    /// A fresh column.
    Column(ColumnDecl),
    /// A fresh parameter.
    Parameter(ParameterDecl),
    /// An inherit marker.
    Inherited(InheritDecl),
}

impl AttributeDecl {
    /// Returns the declared name.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Column(c) => &c.name,
            Self::Parameter(p) => &p.name,
            Self::Inherited(i) => &i.name,
        }
    }
}

impl From<ColumnDecl> for AttributeDecl {
    fn from(decl: ColumnDecl) -> Self {
        Self::Column(decl)
    }
}

impl From<ParameterDecl> for AttributeDecl {
    fn from(decl: ParameterDecl) -> Self {
        Self::Parameter(decl)
    }
}

impl From<InheritDecl> for AttributeDecl {
    fn from(decl: InheritDecl) -> Self {
        Self::Inherited(decl)
    }
}

// =============================================================================
// Method Declarations
// =============================================================================

/// Gates a pipeline on the value a switch evaluates to.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SwitchRef {
    /// Name of the switch.
    pub switch: Arc<str>,
    /// Discriminator values under which the pipeline is active.
    pub values: Vec<Value>,
}

impl SwitchRef {
    /// Active when the switch evaluates to `true`.
    #[must_use]
    pub fn new(switch: impl Into<Arc<str>>) -> Self {
        Self {
            switch: switch.into(),
            values: vec![Value::Bool(true)],
        }
    }

    /// Active when the switch evaluates to any of `values`.
    #[must_use]
    pub fn on<I, V>(switch: impl Into<Arc<str>>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        Self {
            switch: switch.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Returns true if `value` selects the gated pipeline.
    ///
    /// Numbers match across int and float, as in conditions.
    #[must_use]
    pub fn selects(&self, value: &Value) -> bool {
        self.values.iter().any(|v| v.matches(value))
    }
}

/// A pipeline method declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct PipelineDecl {
    /// Method name.
    pub name: Arc<str>,
    /// Columns the pipeline is registered to produce.
    pub outputs: Vec<Arc<str>>,
    /// Signature arguments (inputs and parameters, by name).
    pub args: Vec<MethodArg>,
    /// Run-time condition, if any.
    pub condition: Option<Condition>,
    /// Switch gating, if any.
    pub switch: Option<SwitchRef>,
}

impl PipelineDecl {
    /// Creates a pipeline declaration with no outputs or arguments yet.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            outputs: Vec::new(),
            args: Vec::new(),
            condition: None,
            switch: None,
        }
    }

    /// Registers an output column.
    #[must_use]
    pub fn output(mut self, column: impl Into<Arc<str>>) -> Self {
        self.outputs.push(column.into());
        self
    }

    /// Adds an unannotated signature argument.
    #[must_use]
    pub fn arg(mut self, name: impl Into<Arc<str>>) -> Self {
        self.args.push(MethodArg::new(name));
        self
    }

    /// Adds an annotated signature argument.
    #[must_use]
    pub fn typed_arg(mut self, name: impl Into<Arc<str>>, ty: Type) -> Self {
        self.args.push(MethodArg::typed(name, ty));
        self
    }

    /// Sets the run-time condition.
    #[must_use]
    pub fn condition(mut self, condition: Condition) -> Self {
        self.condition = Some(condition);
        self
    }

    /// Gates the pipeline on a switch evaluating to `true`.
    #[must_use]
    pub fn switch(mut self, switch: impl Into<Arc<str>>) -> Self {
        self.switch = Some(SwitchRef::new(switch));
        self
    }

    /// Gates the pipeline on a switch evaluating to one of `values`.
    #[must_use]
    pub fn switch_on<I, V>(mut self, switch: impl Into<Arc<str>>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        self.switch = Some(SwitchRef::on(switch, values));
        self
    }
}

/// A switch method declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct SwitchDecl {
    /// Method name.
    pub name: Arc<str>,
    /// Signature arguments.
    pub args: Vec<MethodArg>,
}

impl SwitchDecl {
    /// Creates a switch declaration.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// Adds an unannotated signature argument.
    #[must_use]
    pub fn arg(mut self, name: impl Into<Arc<str>>) -> Self {
        self.args.push(MethodArg::new(name));
        self
    }

    /// Adds an annotated signature argument.
    #[must_use]
    pub fn typed_arg(mut self, name: impl Into<Arc<str>>, ty: Type) -> Self {
        self.args.push(MethodArg::typed(name, ty));
        self
    }
}

/// A check method declaration.
#[derive(Clone, Debug, PartialEq)]
pub struct CheckDecl {
    /// Method name.
    pub name: Arc<str>,
    /// The column the check validates.
    pub column: Arc<str>,
    /// Importance tier.
    pub salience: CheckSalience,
    /// Signature arguments.
    pub args: Vec<MethodArg>,
}

impl CheckDecl {
    /// Creates a check of `column`.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, column: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            column: column.into(),
            salience: CheckSalience::default(),
            args: Vec::new(),
        }
    }

    /// Sets the salience tier.
    #[must_use]
    pub fn salience(mut self, salience: CheckSalience) -> Self {
        self.salience = salience;
        self
    }

    /// Adds an unannotated signature argument.
    #[must_use]
    pub fn arg(mut self, name: impl Into<Arc<str>>) -> Self {
        self.args.push(MethodArg::new(name));
        self
    }

    /// Adds an annotated signature argument.
    #[must_use]
    pub fn typed_arg(mut self, name: impl Into<Arc<str>>, ty: Type) -> Self {
        self.args.push(MethodArg::typed(name, ty));
        self
    }
}

// =============================================================================
// Subanalysis Declaration
// =============================================================================

/// Composition of another, already defined, analysis class.
#[derive(Clone, Debug, PartialEq)]
pub struct SubanalysisDecl {
    /// Name of the nested analysis within this one.
    pub name: Arc<str>,
    /// The nested analysis class.
    pub analysis: ClassId,
    /// Human-readable description.
    pub desc: Arc<str>,
}

impl SubanalysisDecl {
    /// Creates a subanalysis declaration.
    #[must_use]
    pub fn new(name: impl Into<Arc<str>>, analysis: ClassId, desc: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            analysis,
            desc: desc.into(),
        }
    }
}
