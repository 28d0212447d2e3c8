//! Composite keys of file items.

pub const FILE_SORT_KEY: &str = "A";
pub const FILE_ITEM_TYPE: &str = "fm.file";

/// Primary partition key of one file.
pub fn file_partition_key(tenant: &str, locale: &str, id: &str) -> String {
    format!("T#{}#L#{}#FM#FILE#{}", tenant, locale, id)
}

/// Partition of the listing index holding every file of a tenant/locale.
pub fn files_gsi1_partition_key(tenant: &str, locale: &str) -> String {
    format!("T#{}#L#{}#FM#FILES", tenant, locale)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_layout() {
        assert_eq!(file_partition_key("root", "en-US", "abc"), "T#root#L#en-US#FM#FILE#abc");
        assert_eq!(files_gsi1_partition_key("root", "en-US"), "T#root#L#en-US#FM#FILES");
    }
}
