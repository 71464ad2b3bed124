//! Adapters for the Firebase REST APIs: Identity Toolkit for custom claims,
//! Cloud Firestore for refresh markers.

pub mod claims;
pub mod markers;

pub use claims::FirebaseClaimsClient;
pub use markers::FirestoreMarkerStore;

use url::Url;

/// Append path segments to a base URL, dropping the trailing empty segment
/// of bases such as "https://firestore.googleapis.com/".
pub(crate) fn join_segments(base: &Url, segments: &[&str]) -> Result<Url, String> {
    let mut url = base.clone();
    url.path_segments_mut()
        .map_err(|_| format!("base URL '{base}' cannot have a path"))?
        .pop_if_empty()
        .extend(segments);
    Ok(url)
}
