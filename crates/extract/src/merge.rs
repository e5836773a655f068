use crate::schema::{EntityCategory, ExtractedEntities};

/// Categories the secondary model is allowed to add to.
pub const SUPPLEMENTED_CATEGORIES: [EntityCategory; 3] = [
    EntityCategory::People,
    EntityCategory::Organizations,
    EntityCategory::Locations,
];

/// Add secondary entities to the primary buckets without replacing anything.
///
/// A secondary entity is appended only when no entry already in the target
/// bucket (including earlier secondary additions) has the exact same surface
/// text. Primary entries are never removed or edited, and buckets outside
/// [`SUPPLEMENTED_CATEGORIES`] are left untouched.
pub fn merge(primary: ExtractedEntities, mut secondary: ExtractedEntities) -> ExtractedEntities {
    let mut merged = primary;

    for category in SUPPLEMENTED_CATEGORIES {
        let additions = std::mem::take(secondary.bucket_mut(category));
        let bucket = merged.bucket_mut(category);

        for entity in additions {
            if !bucket.iter().any(|existing| existing.text == entity.text) {
                bucket.push(entity);
            }
        }
    }

    merged
}
