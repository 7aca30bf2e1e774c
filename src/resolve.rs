use crate::error::ProtectError;
use crate::model::Named;

/// Finds the entity whose ID equals `target`, else the first whose name does.
///
/// Matching is exact and case-sensitive. IDs win over names so an entity
/// named like another entity's ID never shadows the ID owner.
pub fn resolve<'a, T: Named>(
    items: &'a [T],
    target: &str,
    kind: &'static str,
) -> Result<&'a T, ProtectError> {
    items
        .iter()
        .find(|item| item.id() == target)
        .or_else(|| items.iter().find(|item| item.name() == target))
        .ok_or_else(|| ProtectError::not_found(kind, target))
}
