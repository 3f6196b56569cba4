//! Integration tests for the configuration gate in front of the store

use pawtrail_core::config::ConfigBuilder;
use pawtrail_core::domain::Bucket;
use pawtrail_core::ports::IFolderStore;
use pawtrail_drive::{connect, DriveAvailability};
use wiremock::MockServer;

use crate::common::{self, FOUND_FOLDER, LOST_FOLDER};

#[tokio::test]
async fn test_missing_configuration_contacts_nothing() {
    let server = MockServer::start().await;
    let config = ConfigBuilder::new()
        .drive_api_key("")
        .drive_lost_folder_id(LOST_FOLDER)
        .drive_api_base_url(format!("{}/drive/v3", server.uri()))
        .build();

    match connect(&config.drive).unwrap() {
        DriveAvailability::SetupRequired { missing, .. } => {
            assert_eq!(
                missing,
                vec!["drive.api_key", "drive.client_id", "drive.found_folder_id"]
            );
        }
        DriveAvailability::Configured(_) => panic!("expected SetupRequired"),
    }

    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_configured_store_lists_from_configured_base() {
    let server = MockServer::start().await;
    common::mount_listing(
        &server,
        FOUND_FOLDER,
        serde_json::json!([common::file_json("f1", "cat.jpg", "2025-03-01T08:00:00Z")]),
    )
    .await;

    let config = ConfigBuilder::new()
        .drive_api_key(common::API_KEY)
        .drive_client_id("client-id")
        .drive_lost_folder_id(LOST_FOLDER)
        .drive_found_folder_id(FOUND_FOLDER)
        .drive_api_base_url(format!("{}/drive/v3", server.uri()))
        .drive_upload_base_url(format!("{}/upload/drive/v3", server.uri()))
        .build();

    let store = match connect(&config.drive).unwrap() {
        DriveAvailability::Configured(store) => store,
        DriveAvailability::SetupRequired { missing, .. } => {
            panic!("unexpected missing settings: {missing:?}")
        }
    };

    assert!(server.received_requests().await.unwrap().is_empty());

    let images = store.list_images(Bucket::Found).await.unwrap();
    assert_eq!(images.len(), 1);
    assert_eq!(images[0].name(), "cat.jpg");
}
