//! C3 method-resolution order.
//!
//! The order in which a class's ancestors are consulted when the same name
//! is declared by more than one of them. The class comes first, every
//! class precedes its own bases, and the declared order of bases is kept.

use lineage_foundation::{ClassId, Error, ErrorKind, Result};

/// Computes the C3 linearization of `class`.
///
/// `base_mros` holds the already computed linearization of each entry of
/// `bases`, in the same order.
///
/// # Errors
/// Returns `InconsistentHierarchy` if no order satisfies every base's
/// linearization and the declared order of bases.
pub fn linearize(class: &ClassId, bases: &[ClassId], base_mros: &[&[ClassId]]) -> Result<Vec<ClassId>> {
    let mut sequences: Vec<Vec<ClassId>> = base_mros
        .iter()
        .map(|mro| mro.to_vec())
        .chain(std::iter::once(bases.to_vec()))
        .collect();
    let mut order = vec![class.clone()];

    loop {
        sequences.retain(|s| !s.is_empty());
        if sequences.is_empty() {
            return Ok(order);
        }

        // A head is eligible if it does not appear in the tail of any sequence
        let head = sequences
            .iter()
            .map(|s| &s[0])
            .find(|candidate| !sequences.iter().any(|s| s[1..].contains(candidate)))
            .cloned();

        let Some(head) = head else {
            return Err(Error::new(ErrorKind::InconsistentHierarchy {
                class: class.clone(),
                bases: bases.iter().map(ToString::to_string).collect(),
            }));
        };

        for s in &mut sequences {
            if s[0] == head {
                s.remove(0);
            }
        }
        order.push(head);
    }
}
