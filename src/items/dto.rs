use serde::Deserialize;

/// Body of `POST /api/shopitems` and `PUT /api/shopitems/:id`.
/// Unknown fields are ignored; absent fields stay absent (create) or unchanged (update).
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemPayload {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub is_in_stock: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_camel_case_fields() {
        let p: ItemPayload = serde_json::from_str(
            r#"{"name":"Mug","description":"Blue","price":9.5,"isInStock":true,"_id":"x"}"#,
        )
        .unwrap();
        assert_eq!(p.name.as_deref(), Some("Mug"));
        assert_eq!(p.price, Some(9.5));
        assert_eq!(p.is_in_stock, Some(true));
    }

    #[test]
    fn partial_body_is_accepted() {
        let p: ItemPayload = serde_json::from_str(r#"{"price":3}"#).unwrap();
        assert_eq!(
            p,
            ItemPayload {
                price: Some(3.0),
                ..Default::default()
            }
        );
    }

    #[test]
    fn wrong_types_are_rejected() {
        assert!(serde_json::from_str::<ItemPayload>(r#"{"price":"cheap"}"#).is_err());
        assert!(serde_json::from_str::<ItemPayload>(r#"{"isInStock":"yes"}"#).is_err());
    }
}
