use serde::Deserialize;

/// A list response. Some endpoints return a bare array, paginated ones wrap
/// it as `{"count": .., "next": .., "results": [...]}`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Listing<T> {
    Plain(Vec<T>),
    Paged { results: Vec<T> },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Plain(items) => items,
            Listing::Paged { results } => results,
        }
    }
}

impl<T> From<Listing<T>> for Vec<T> {
    fn from(listing: Listing<T>) -> Self {
        listing.into_vec()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Project;

    #[test]
    fn bare_array() {
        let listing: Listing<Project> =
            serde_json::from_str(r#"[{"id": 1, "name": "Website"}]"#).unwrap();
        let projects = listing.into_vec();
        assert_eq!(projects.len(), 1);
        assert_eq!(projects[0].name, "Website");
    }

    #[test]
    fn paged_object() {
        let json = r#"{"count": 2, "next": null, "previous": null,
            "results": [{"id": 1, "name": "A"}, {"id": 2, "name": "B"}]}"#;
        let projects: Vec<Project> = serde_json::from_str::<Listing<Project>>(json)
            .unwrap()
            .into();
        assert_eq!(projects.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn other_shapes_fail() {
        assert!(serde_json::from_str::<Listing<Project>>(r#"{"items": []}"#).is_err());
    }
}
