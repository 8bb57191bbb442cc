#![allow(clippy::unwrap_used, clippy::expect_used)]

//! `CommonLabTestClientV1` as other modules see it.

mod common;

use std::sync::Arc;

use commonlabtest::{
    CommonLabTestClientV1, CommonLabTestError, LabTest, LabTestFilter, LabTestGroup,
    LabTestType, LabTestTypeFilter, LocalClient, Privilege, SecurityContext,
};
use common::{admin, create_service, granted};

async fn create_client() -> Arc<dyn CommonLabTestClientV1> {
    Arc::new(LocalClient::new(create_service().await))
}

#[tokio::test]
async fn test_client_round_trip() {
    let client = create_client().await;
    let ctx = admin();

    let gxp = client
        .save_lab_test_type(&ctx, LabTestType::new("GXP", LabTestGroup::Bacteriology, true))
        .await
        .unwrap();
    let lab_test = client
        .save_lab_test(&ctx, LabTest::new(1, 7, gxp.id.unwrap()))
        .await
        .unwrap();

    let filter = LabTestTypeFilter {
        requires_specimen: Some(true),
        ..LabTestTypeFilter::default()
    };
    assert_eq!(client.list_lab_test_types(&ctx, filter, false).await.unwrap().len(), 1);
    assert_eq!(
        client
            .list_lab_tests(&ctx, LabTestFilter::for_patient(7), false)
            .await
            .unwrap(),
        vec![lab_test.clone()]
    );
    assert_eq!(client.get_lab_test_by_order(&ctx, 1).await.unwrap(), Some(lab_test));
    assert!(client.get_lab_test(&ctx, 9_999).await.unwrap().is_none());
}

#[tokio::test]
async fn test_client_maps_errors() {
    let client = create_client().await;

    let denied = client
        .list_all_lab_test_types(&SecurityContext::anonymous(), false)
        .await
        .unwrap_err();
    assert_eq!(
        denied,
        CommonLabTestError::not_authorized("View Common Lab Test Metadata")
    );

    let viewer = granted(&[Privilege::ViewLabTest]);
    let short = client
        .search_lab_tests_by_reference(&viewer, "12", false)
        .await
        .unwrap_err();
    assert_eq!(
        short,
        CommonLabTestError::invalid_argument(
            "Reference number to search should at least be 4 character long."
        )
    );

    let unsaved = LabTestType::new("GXP", LabTestGroup::Bacteriology, true);
    let err = client
        .delete_lab_test_type(&admin(), &unsaved, false)
        .await
        .unwrap_err();
    assert!(matches!(err, CommonLabTestError::InvalidArgument { .. }));
}

#[tokio::test]
async fn test_client_surfaces_storage_failures() {
    let client = create_client().await;
    let ctx = admin();

    // No lab test type 42 exists.
    let err = client
        .save_lab_test(&ctx, LabTest::new(1, 7, 42))
        .await
        .unwrap_err();

    match err {
        CommonLabTestError::OperationFailed { message } => {
            assert!(message.contains("FOREIGN KEY"), "{message}");
        }
        other => panic!("expected OperationFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_delete_only_refuses_a_type_in_use() {
    let client = create_client().await;
    let ctx = admin();
    let gxp = client
        .save_lab_test_type(&ctx, LabTestType::new("GXP", LabTestGroup::Bacteriology, true))
        .await
        .unwrap();
    let lab_test = client
        .save_lab_test(&ctx, LabTest::new(1, 7, gxp.id.unwrap()))
        .await
        .unwrap();

    let err = client.delete_lab_test_type_only(&ctx, &gxp).await.unwrap_err();
    assert!(matches!(err, CommonLabTestError::OperationFailed { .. }), "{err:?}");
    assert!(client.get_lab_test_type(&ctx, gxp.id.unwrap()).await.unwrap().is_some());

    client.delete_lab_test(&ctx, &lab_test).await.unwrap();
    client.delete_lab_test_type_only(&ctx, &gxp).await.unwrap();
    assert!(client.get_lab_test_type(&ctx, gxp.id.unwrap()).await.unwrap().is_none());
}
