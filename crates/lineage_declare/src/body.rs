//! The raw declarations of one analysis class.

use lineage_foundation::{ClassId, DataSpace};

use crate::decl::{
    AttributeDecl, CheckDecl, ColumnDecl, InheritDecl, ParameterDecl, PipelineDecl,
    SubanalysisDecl, SwitchDecl,
};

/// Everything one analysis class body declares, in declaration order.
///
/// A body knows its bases by identity only. It is turned into a resolved
/// `AnalysisSpec` exactly once, when it is registered.
#[derive(Clone, Debug, PartialEq)]
pub struct ClassBody {
    /// Identity of the class.
    pub class: ClassId,
    /// The data space; inherited from the bases when `None`.
    pub space: Option<DataSpace>,
    /// Direct bases, in declaration order.
    pub bases: Vec<ClassId>,
    /// Columns, parameters and inherit markers.
    pub attributes: Vec<AttributeDecl>,
    /// Nested analyses.
    pub subanalyses: Vec<SubanalysisDecl>,
    /// Switch methods.
    pub switches: Vec<SwitchDecl>,
    /// Pipeline methods.
    pub pipelines: Vec<PipelineDecl>,
    /// Check methods.
    pub checks: Vec<CheckDecl>,
}

impl ClassBody {
    /// Starts an empty body for `class`.
    #[must_use]
    pub fn new(class: ClassId) -> Self {
        Self {
            class,
            space: None,
            bases: Vec::new(),
            attributes: Vec::new(),
            subanalyses: Vec::new(),
            switches: Vec::new(),
            pipelines: Vec::new(),
            checks: Vec::new(),
        }
    }

    /// Declares the data space the analysis operates over.
    #[must_use]
    pub fn space(mut self, space: DataSpace) -> Self {
        self.space = Some(space);
        self
    }

    /// Adds a direct base class.
    #[must_use]
    pub fn extends(mut self, base: &ClassId) -> Self {
        self.bases.push(base.clone());
        self
    }

    /// Declares a column.
    #[must_use]
    pub fn column(mut self, decl: ColumnDecl) -> Self {
        self.attributes.push(AttributeDecl::Column(decl));
        self
    }

    /// Declares a parameter.
    #[must_use]
    pub fn parameter(mut self, decl: ParameterDecl) -> Self {
        self.attributes.push(AttributeDecl::Parameter(decl));
        self
    }

    /// Re-states an inherited column or parameter.
    #[must_use]
    pub fn inherit(mut self, decl: InheritDecl) -> Self {
        self.attributes.push(AttributeDecl::Inherited(decl));
        self
    }

    /// Declares a pipeline.
    #[must_use]
    pub fn pipeline(mut self, decl: PipelineDecl) -> Self {
        self.pipelines.push(decl);
        self
    }

    /// Declares a switch.
    #[must_use]
    pub fn switch(mut self, decl: SwitchDecl) -> Self {
        self.switches.push(decl);
        self
    }

    /// Declares a check.
    #[must_use]
    pub fn check(mut self, decl: CheckDecl) -> Self {
        self.checks.push(decl);
        self
    }

    /// Declares a subanalysis.
    #[must_use]
    pub fn subanalysis(mut self, decl: SubanalysisDecl) -> Self {
        self.subanalyses.push(decl);
        self
    }

    /// Returns every name declared in this body, in declaration order
    /// within each kind.
    pub fn declared_names(&self) -> impl Iterator<Item = &str> {
        self.attributes
            .iter()
            .map(AttributeDecl::name)
            .chain(self.subanalyses.iter().map(|s| s.name.as_ref()))
            .chain(self.switches.iter().map(|s| s.name.as_ref()))
            .chain(self.pipelines.iter().map(|p| p.name.as_ref()))
            .chain(self.checks.iter().map(|c| c.name.as_ref()))
    }
}
