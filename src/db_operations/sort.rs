//! In-process sorting of listed files by `field_ASC` / `field_DESC` specs.

use super::file::File;
use std::cmp::Ordering;

/// Fields a listing can be sorted on.
pub const SORTABLE_FIELDS: &[&str] = &["id", "name", "key", "size", "type", "createdOn", "createdBy"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Parses `name_ASC`. Unknown fields and malformed specs give `None`.
    pub fn parse(spec: &str) -> Option<Self> {
        let (field, direction) = spec.rsplit_once('_')?;
        let direction = match direction {
            "ASC" => SortDirection::Asc,
            "DESC" => SortDirection::Desc,
            _ => return None,
        };
        SORTABLE_FIELDS.contains(&field).then(|| Self {
            field: field.to_string(),
            direction,
        })
    }

    fn compare(&self, a: &File, b: &File) -> Ordering {
        let ordering = match self.field.as_str() {
            "id" => a.id.cmp(&b.id),
            "name" => a.name.cmp(&b.name),
            "key" => a.key.cmp(&b.key),
            "size" => a.size.cmp(&b.size),
            "type" => a.file_type.cmp(&b.file_type),
            "createdOn" => a.created_on.cmp(&b.created_on),
            "createdBy" => {
                let owner = |f: &File| f.created_by.as_ref().map(|c| c.id.clone());
                owner(a).cmp(&owner(b))
            }
            _ => Ordering::Equal,
        };
        match self.direction {
            SortDirection::Asc => ordering,
            SortDirection::Desc => ordering.reverse(),
        }
    }
}

/// Stable sort of `files` by `specs`, earlier specs taking precedence.
/// Specs that do not parse are skipped.
pub fn sort_files(mut files: Vec<File>, specs: &[String]) -> Vec<File> {
    let parsed: Vec<SortSpec> = specs
        .iter()
        .filter_map(|spec| {
            let parsed = SortSpec::parse(spec);
            if parsed.is_none() {
                crate::log_storage_debug!("Ignoring unsupported sort '{}'", spec);
            }
            parsed
        })
        .collect();
    if parsed.is_empty() {
        return files;
    }
    files.sort_by(|a, b| {
        parsed
            .iter()
            .map(|spec| spec.compare(a, b))
            .find(|ordering| *ordering != Ordering::Equal)
            .unwrap_or(Ordering::Equal)
    });
    files
}
