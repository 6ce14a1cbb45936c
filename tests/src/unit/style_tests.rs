use super::test_client;
use inkweave_core::styles::{StyleKind, WritingStyleCreate, WritingStyleUpdate};
use inkweave_core::ApiError;

fn preset_json(id: i64, name: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "project_id": null,
        "name": name,
        "style_type": "preset",
        "preset_id": "natural",
        "description": "platform preset",
        "prompt_content": "write plainly",
        "is_default": false,
        "order_index": id,
        "created_at": "2025-06-01T00:00:00Z",
        "updated_at": "2025-06-01T00:00:00Z"
    })
}

fn custom_json(id: i64, project: &str, name: &str, is_default: bool) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "project_id": project,
        "name": name,
        "style_type": "custom",
        "preset_id": null,
        "description": null,
        "prompt_content": "blades sing, rain answers",
        "is_default": is_default,
        "order_index": id,
        "created_at": "2025-06-02T00:00:00Z",
        "updated_at": "2025-06-02T00:00:00Z"
    })
}

#[tokio::test]
async fn created_custom_style_lists_after_presets_and_is_tagged_custom() {
    let mut server = mockito::Server::new_async().await;
    let _create = server
        .mock("POST", "/writing-styles")
        .with_status(201)
        .with_body(custom_json(11, "p1", "Wuxia", false).to_string())
        .create_async()
        .await;
    let _list = server
        .mock("GET", "/writing-styles/project/p1")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "total": 3,
                "styles": [
                    preset_json(1, "Natural"),
                    preset_json(2, "Classical"),
                    custom_json(11, "p1", "Wuxia", false),
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;

    let (client, _notifier) = test_client(&server);
    let created = client
        .styles()
        .create(&WritingStyleCreate {
            project_id: "p1".to_string(),
            name: Some("Wuxia".to_string()),
            prompt_content: Some("blades sing, rain answers".to_string()),
            ..WritingStyleCreate::default()
        })
        .await
        .expect("create");
    assert_eq!(created.name, "Wuxia");
    assert!(!created.prompt_content.is_empty());

    let catalog = client.styles().for_project("p1").await.expect("catalog");
    let wuxia_pos = catalog
        .styles()
        .iter()
        .position(|style| style.name == "Wuxia")
        .expect("listed");
    let last_preset_pos = catalog
        .styles()
        .iter()
        .rposition(|style| style.is_preset())
        .expect("presets");
    assert!(wuxia_pos > last_preset_pos, "custom sorts after presets");
    let wuxia = &catalog.styles()[wuxia_pos];
    assert!(wuxia.is_custom());
    assert_eq!(wuxia.style_type, StyleKind::Custom);
}

#[tokio::test]
async fn deleting_the_only_custom_style_never_reaches_the_network() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/writing-styles/project/p1")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "total": 2,
                "styles": [
                    preset_json(1, "Natural"),
                    custom_json(11, "p1", "Wuxia", false),
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    // No DELETE is mocked: the guard must reject before any request.
    let delete = server
        .mock("DELETE", "/writing-styles/11")
        .expect(0)
        .create_async()
        .await;

    let (client, notifier) = test_client(&server);
    let catalog = client.styles().for_project("p1").await.expect("catalog");
    let err = client.styles().delete(&catalog, 11).await.unwrap_err();

    assert!(matches!(err, ApiError::Precondition(_)));
    assert_eq!(notifier.messages().len(), 1);
    delete.assert_async().await;
}

#[tokio::test]
async fn preset_styles_are_rejected_by_edit_and_delete_paths() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/writing-styles/project/p1")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "total": 3,
                "styles": [
                    preset_json(1, "Natural"),
                    custom_json(11, "p1", "Wuxia", false),
                    custom_json(12, "p1", "Noir", false),
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let update = server
        .mock("PUT", "/writing-styles/1")
        .expect(0)
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/writing-styles/1")
        .expect(0)
        .create_async()
        .await;

    let (client, _notifier) = test_client(&server);
    let catalog = client.styles().for_project("p1").await.expect("catalog");

    let preset = catalog.get(1).expect("preset");
    let err = client
        .styles()
        .update(
            preset,
            &WritingStyleUpdate {
                name: Some("renamed".to_string()),
                ..WritingStyleUpdate::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Precondition(_)));

    let err = client.styles().delete(&catalog, 1).await.unwrap_err();
    assert!(matches!(err, ApiError::Precondition(_)));

    update.assert_async().await;
    delete.assert_async().await;
}

#[tokio::test]
async fn default_style_survives_until_another_default_is_chosen() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/writing-styles/project/p1")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "total": 3,
                "styles": [
                    preset_json(1, "Natural"),
                    custom_json(11, "p1", "Wuxia", true),
                    custom_json(12, "p1", "Noir", false),
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let _delete_ok = server
        .mock("DELETE", "/writing-styles/12")
        .with_status(204)
        .create_async()
        .await;

    let (client, _notifier) = test_client(&server);
    let catalog = client.styles().for_project("p1").await.expect("catalog");

    // The default custom style is protected.
    let err = client.styles().delete(&catalog, 11).await.unwrap_err();
    assert!(matches!(err, ApiError::Precondition(_)));

    // Its non-default sibling can be removed.
    client.styles().delete(&catalog, 12).await.expect("delete");
}

#[tokio::test]
async fn deletable_custom_style_goes_through() {
    let mut server = mockito::Server::new_async().await;
    let _list = server
        .mock("GET", "/writing-styles/project/p1")
        .with_status(200)
        .with_body(
            serde_json::json!({
                "total": 3,
                "styles": [
                    preset_json(1, "Natural"),
                    custom_json(11, "p1", "Wuxia", false),
                    custom_json(12, "p1", "Noir", false),
                ]
            })
            .to_string(),
        )
        .create_async()
        .await;
    let delete = server
        .mock("DELETE", "/writing-styles/11")
        .with_status(204)
        .create_async()
        .await;

    let (client, _notifier) = test_client(&server);
    let catalog = client.styles().for_project("p1").await.expect("catalog");
    client.styles().delete(&catalog, 11).await.expect("delete");
    delete.assert_async().await;
}
