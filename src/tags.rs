//! Tag index views over an image list.
//!
//! Both views are recomputed from scratch on every call; the image list they
//! read from is the cached one, so this stays cheap.
//!
//! The two views deliberately sort differently:
//!
//! - [`list_tags`] uses plain code-point order (`"B" < "a" < "b"`), the order
//!   tag navigation has always used.
//! - [`list_tag_groups`] uses Unicode collation (CLDR root order via
//!   `feruca`), so `"été" < "fleurs" < "zoo"` and `"a" < "b" < "B"`, matching
//!   how tag pages are listed.

use crate::types::{Image, TagGroup};
use feruca::Collator;
use std::collections::{BTreeSet, HashMap, HashSet};

/// Distinct tags across all images, in code-point order.
///
/// De-duplication is exact: `"Nature"` and `"nature"` are different tags.
pub fn list_tags(images: &[Image]) -> Vec<String> {
    images
        .iter()
        .flat_map(|image| image.tags.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// One group per distinct tag, in Unicode collation order of the tag name.
///
/// Within a group, images keep the order they have in `images`. An image is
/// added once per distinct tag it carries.
pub fn list_tag_groups(images: &[Image]) -> Vec<TagGroup> {
    let mut groups: Vec<TagGroup> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for image in images {
        let mut seen = HashSet::new();
        for tag in &image.tags {
            if !seen.insert(tag.as_str()) {
                continue;
            }
            let slot = *index.entry(tag.as_str()).or_insert_with(|| {
                groups.push(TagGroup {
                    tag_name: tag.clone(),
                    images: Vec::new(),
                });
                groups.len() - 1
            });
            groups[slot].images.push(image.clone());
        }
    }

    let mut collator = Collator::default();
    groups.sort_by(|a, b| collator.collate(a.tag_name.as_str(), b.tag_name.as_str()));
    groups
}
