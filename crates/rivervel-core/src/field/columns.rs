use crate::consts::{UX_ALIASES, UY_ALIASES, X_COLUMN, Y_COLUMN};
use crate::error::{Result, VelocityError};

/// A header name resolved to its column position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedColumn {
    pub name: String,
    pub index: usize,
}

/// Column positions of the four fields a velocity table must provide,
/// resolved once from the header.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMap {
    pub x: ResolvedColumn,
    pub y: ResolvedColumn,
    pub ux: ResolvedColumn,
    pub uy: ResolvedColumn,
}

impl ColumnMap {
    pub fn resolve(headers: &csv::StringRecord) -> Result<Self> {
        Ok(Self {
            x: resolve_alias(headers, "X", &[X_COLUMN])?,
            y: resolve_alias(headers, "Y", &[Y_COLUMN])?,
            ux: resolve_alias(headers, "Ux", &UX_ALIASES)?,
            uy: resolve_alias(headers, "Uy", &UY_ALIASES)?,
        })
    }

    /// Largest column index referenced, used to reject short rows early.
    pub fn max_index(&self) -> usize {
        self.x
            .index
            .max(self.y.index)
            .max(self.ux.index)
            .max(self.uy.index)
    }
}

/// First alias present in `headers` wins.
pub fn resolve_alias(
    headers: &csv::StringRecord,
    field: &'static str,
    aliases: &[&'static str],
) -> Result<ResolvedColumn> {
    aliases
        .iter()
        .find_map(|alias| {
            headers
                .iter()
                .position(|h| h == *alias)
                .map(|index| ResolvedColumn {
                    name: (*alias).to_string(),
                    index,
                })
        })
        .ok_or_else(|| VelocityError::MissingColumn {
            field,
            tried: aliases.to_vec(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_order_wins_over_column_order() {
        let headers = csv::StringRecord::from(vec!["X", "Y", "Ux", "Ux_[m.s-1]", "Uy"]);
        let map = ColumnMap::resolve(&headers).unwrap();
        assert_eq!(map.ux.name, "Ux_[m.s-1]");
        assert_eq!(map.ux.index, 3);
        assert_eq!(map.uy.index, 4);
        assert_eq!(map.max_index(), 4);
    }

    #[test]
    fn test_missing_uy() {
        let headers = csv::StringRecord::from(vec!["X", "Y", "Ux"]);
        match ColumnMap::resolve(&headers) {
            Err(VelocityError::MissingColumn { field, tried }) => {
                assert_eq!(field, "Uy");
                assert_eq!(tried.len(), UY_ALIASES.len());
            }
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }
}
