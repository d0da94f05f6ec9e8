//! Maps heterogeneous raw feed entries into `LocalDynamic`.
//!
//! Variant selection is structural: a payload whose item carries `content`
//! is a Text dynamic, one with `description` is an Article. Anything else
//! (videos, polls, future API shapes) is skipped without touching the rest
//! of the cycle — feed shape drift must not halt the pipeline.

use tracing::debug;

use bilibili_client::{CardPayload, FeedCard};
use dynwatch_common::{DynamicKind, ImageRef, LocalDynamic};

pub fn normalize_card(card: &FeedCard) -> Option<LocalDynamic> {
    let dynamic_id = card.desc.dynamic_id.as_str();

    let payload = match CardPayload::parse(&card.card) {
        Ok(p) => p,
        Err(e) => {
            debug!(dynamic_id, error = %e, "Skipping card with unparseable payload");
            return None;
        }
    };

    if let Some(content) = payload.item.content {
        return Some(LocalDynamic {
            kind: DynamicKind::Text,
            id: DynamicKind::Text.local_id(dynamic_id),
            dynamic_id: dynamic_id.to_string(),
            title: String::new(),
            content,
            images: Vec::new(),
            timestamp: payload.item.timestamp,
            has_origin: payload.origin.is_some(),
        });
    }

    if let Some(description) = payload.item.description {
        let images = payload
            .item
            .pictures
            .unwrap_or_default()
            .into_iter()
            .map(|pic| ImageRef { src: pic.img_src })
            .collect();

        return Some(LocalDynamic {
            kind: DynamicKind::Article,
            id: DynamicKind::Article.local_id(dynamic_id),
            dynamic_id: dynamic_id.to_string(),
            title: payload.item.title.unwrap_or_default(),
            content: description,
            images,
            timestamp: payload.item.upload_time,
            // Article-type quoting is not modeled by the feed.
            has_origin: false,
        });
    }

    debug!(dynamic_id, "Skipping card with unknown shape");
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use bilibili_client::CardDesc;

    fn card(dynamic_id: &str, payload: serde_json::Value) -> FeedCard {
        FeedCard {
            desc: CardDesc {
                dynamic_id: dynamic_id.to_string(),
            },
            card: payload.to_string(),
        }
    }

    #[test]
    fn content_field_yields_text_dynamic() {
        let card = card(
            "100",
            serde_json::json!({"item": {"content": "hello", "timestamp": 1700000000}}),
        );
        let dynamic = normalize_card(&card).unwrap();
        assert_eq!(dynamic.kind, DynamicKind::Text);
        assert_eq!(dynamic.id, "text_100");
        assert_eq!(dynamic.dynamic_id, "100");
        assert_eq!(dynamic.title, "");
        assert_eq!(dynamic.content, "hello");
        assert!(dynamic.images.is_empty());
        assert_eq!(dynamic.timestamp, 1700000000);
        assert!(!dynamic.has_origin);
    }

    #[test]
    fn origin_field_marks_text_dynamic_as_repost() {
        let card = card(
            "101",
            serde_json::json!({
                "item": {"content": "look at this", "timestamp": 1},
                "origin": "{\"item\":{}}"
            }),
        );
        assert!(normalize_card(&card).unwrap().has_origin);
    }

    #[test]
    fn description_field_yields_article_dynamic() {
        let card = card(
            "200",
            serde_json::json!({
                "item": {
                    "title": "T",
                    "description": "world",
                    "pictures": [{"img_src": "https://i0.hdslb.com/a.jpg"}],
                    "upload_time": 1700000500
                }
            }),
        );
        let dynamic = normalize_card(&card).unwrap();
        assert_eq!(dynamic.kind, DynamicKind::Article);
        assert_eq!(dynamic.id, "article_200");
        assert_eq!(dynamic.title, "T");
        assert_eq!(dynamic.content, "world");
        assert_eq!(dynamic.images, vec![ImageRef { src: "https://i0.hdslb.com/a.jpg".into() }]);
        assert_eq!(dynamic.timestamp, 1700000500);
        assert!(!dynamic.has_origin);
    }

    #[test]
    fn article_without_pictures_gets_empty_images() {
        let card = card(
            "201",
            serde_json::json!({"item": {"title": "T", "description": "d", "upload_time": 2}}),
        );
        assert!(normalize_card(&card).unwrap().images.is_empty());
    }

    #[test]
    fn malformed_picture_urls_pass_through() {
        let card = card(
            "202",
            serde_json::json!({
                "item": {
                    "description": "d",
                    "pictures": [{"img_src": "not a url"}],
                    "upload_time": 2
                }
            }),
        );
        assert_eq!(normalize_card(&card).unwrap().images[0].src, "not a url");
    }

    #[test]
    fn unknown_shape_is_skipped() {
        let card = card("300", serde_json::json!({"item": {"some_video_field": 1}}));
        assert!(normalize_card(&card).is_none());
    }

    #[test]
    fn unparseable_payload_is_skipped() {
        let card = FeedCard {
            desc: CardDesc {
                dynamic_id: "400".to_string(),
            },
            card: "not json at all".to_string(),
        };
        assert!(normalize_card(&card).is_none());
    }

    #[test]
    fn same_source_id_classifies_to_distinct_local_ids() {
        let text = card("500", serde_json::json!({"item": {"content": "c", "timestamp": 1}}));
        let article = card("500", serde_json::json!({"item": {"description": "d", "upload_time": 1}}));
        assert_ne!(
            normalize_card(&text).unwrap().id,
            normalize_card(&article).unwrap().id
        );
    }
}
