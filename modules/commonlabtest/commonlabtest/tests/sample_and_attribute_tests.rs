#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Samples and attributes, including the filters resolved through the owning lab test.

mod common;

use commonlabtest::{
    AttributeFilter, LabRecord, LabTestAttribute, LabTestGroup, LabTestSample,
    LabTestSampleStatus, SampleFilter,
};
use common::{
    TestService, admin, create_service, ids, seed_attribute_type, seed_test, seed_type,
};
use time::OffsetDateTime;
use time::macros::datetime;

const NEW_YEAR: OffsetDateTime = datetime!(2024-01-01 08:00 UTC);

async fn seed_sample(
    service: &TestService,
    lab_test_id: i32,
    patient_id: i32,
    status: LabTestSampleStatus,
    collected: OffsetDateTime,
) -> LabTestSample {
    let sample = LabTestSample {
        lab_test_id: Some(lab_test_id),
        collector_id: Some(300 + patient_id),
        specimen_name: Some("Sputum".to_owned()),
        ..LabTestSample::new(patient_id, status, collected)
            .with_identifier(format!("S-{lab_test_id}-{}", collected.unix_timestamp()))
    };
    service.save_sample(&admin(), sample).await.unwrap()
}

#[tokio::test]
async fn test_sample_filters_through_owning_lab_test() {
    let service = create_service().await;
    let ctx = admin();
    let gxp = seed_type(&service, "GXP", LabTestGroup::Bacteriology, true).await;
    let first = seed_test(&service, gxp.id.unwrap(), 7, 11, NEW_YEAR).await;
    let second = seed_test(&service, gxp.id.unwrap(), 7, 12, datetime!(2024-01-02 08:00 UTC)).await;

    let s1 = seed_sample(
        &service,
        first.id.unwrap(),
        7,
        LabTestSampleStatus::Collected,
        datetime!(2024-01-01 09:00 UTC),
    )
    .await;
    let s2 = seed_sample(
        &service,
        second.id.unwrap(),
        7,
        LabTestSampleStatus::Accepted,
        datetime!(2024-01-02 09:00 UTC),
    )
    .await;

    let by_order = service.list_samples_by_order(&ctx, 12, false).await.unwrap();
    assert_eq!(ids(&by_order), [s2.id.unwrap()]);

    let by_identifiers = service
        .list_samples_by_identifiers(&ctx, None, Some("ORD-11".to_owned()), None, false)
        .await
        .unwrap();
    assert_eq!(ids(&by_identifiers), [s1.id.unwrap()]);

    let by_reference = service
        .list_samples_by_identifiers(&ctx, None, None, Some("LAB-0012".to_owned()), false)
        .await
        .unwrap();
    assert_eq!(ids(&by_reference), [s2.id.unwrap()]);

    let own_identifier = service
        .list_samples_by_identifiers(&ctx, s1.lab_sample_identifier.clone(), None, None, false)
        .await
        .unwrap();
    assert_eq!(ids(&own_identifier), [s1.id.unwrap()]);

    let by_collector = service.list_samples_by_collector(&ctx, 307, false).await.unwrap();
    assert_eq!(ids(&by_collector), [s1.id.unwrap(), s2.id.unwrap()]);

    let by_specimen = SampleFilter {
        specimen_name: Some("Sputum".to_owned()),
        lab_test_id: first.id,
        ..SampleFilter::default()
    };
    assert_eq!(
        ids(&service.list_samples(&ctx, &by_specimen, false).await.unwrap()),
        [s1.id.unwrap()]
    );
}

#[tokio::test]
async fn test_samples_by_status_and_date_range() {
    let service = create_service().await;
    let ctx = admin();
    let gxp = seed_type(&service, "GXP", LabTestGroup::Bacteriology, true).await;
    let lab_test = seed_test(&service, gxp.id.unwrap(), 7, 1, NEW_YEAR).await;
    let test_id = lab_test.id.unwrap();

    let early = seed_sample(
        &service,
        test_id,
        7,
        LabTestSampleStatus::Accepted,
        datetime!(2024-01-05 09:00 UTC),
    )
    .await;
    let late = seed_sample(
        &service,
        test_id,
        7,
        LabTestSampleStatus::Accepted,
        datetime!(2024-02-05 09:00 UTC),
    )
    .await;
    let rejected = seed_sample(
        &service,
        test_id,
        7,
        LabTestSampleStatus::Rejected,
        datetime!(2024-03-05 09:00 UTC),
    )
    .await;

    let january = service
        .list_samples_by_status(
            &ctx,
            LabTestSampleStatus::Accepted,
            Some(datetime!(2024-01-01 00:00 UTC)),
            Some(datetime!(2024-01-31 23:59 UTC)),
            false,
        )
        .await
        .unwrap();
    assert_eq!(ids(&january), [early.id.unwrap()]);

    // Both bounds are inclusive.
    let exact = service
        .list_samples_by_status(
            &ctx,
            LabTestSampleStatus::Accepted,
            Some(late.collection_date),
            Some(late.collection_date),
            false,
        )
        .await
        .unwrap();
    assert_eq!(ids(&exact), [late.id.unwrap()]);

    let earliest = service.get_earliest_sample(&ctx, 7, None).await.unwrap();
    let latest = service.get_latest_sample(&ctx, 7, None).await.unwrap();
    let latest_accepted = service
        .get_latest_sample(&ctx, 7, Some(LabTestSampleStatus::Accepted))
        .await
        .unwrap();

    assert_eq!(earliest.and_then(|s| s.id), early.id);
    assert_eq!(latest.and_then(|s| s.id), rejected.id);
    assert_eq!(latest_accepted.and_then(|s| s.id), late.id);
    assert!(service.get_latest_sample(&ctx, 8, None).await.unwrap().is_none());
}

#[tokio::test]
async fn test_collection_dates_compare_as_instants() {
    let service = create_service().await;
    let ctx = admin();
    let gxp = seed_type(&service, "GXP", LabTestGroup::Bacteriology, true).await;
    let lab_test = seed_test(&service, gxp.id.unwrap(), 7, 1, NEW_YEAR).await;
    let test_id = lab_test.id.unwrap();

    // 03:30 UTC the same day, recorded at the clinic's local offset.
    let local = seed_sample(
        &service,
        test_id,
        7,
        LabTestSampleStatus::Accepted,
        datetime!(2024-01-05 09:00 +05:30),
    )
    .await;
    let utc = seed_sample(
        &service,
        test_id,
        7,
        LabTestSampleStatus::Accepted,
        datetime!(2024-01-05 05:00 UTC),
    )
    .await;

    assert_eq!(local.collection_date, datetime!(2024-01-05 03:30 UTC));
    let earliest = service.get_earliest_sample(&ctx, 7, None).await.unwrap();
    let latest = service.get_latest_sample(&ctx, 7, None).await.unwrap();
    assert_eq!(earliest.and_then(|s| s.id), local.id);
    assert_eq!(latest.and_then(|s| s.id), utc.id);

    let morning = service
        .list_samples_by_status(
            &ctx,
            LabTestSampleStatus::Accepted,
            Some(datetime!(2024-01-05 08:00 +05:30)),
            Some(datetime!(2024-01-05 04:00 UTC)),
            false,
        )
        .await
        .unwrap();
    assert_eq!(ids(&morning), [local.id.unwrap()]);
}

#[tokio::test]
async fn test_void_sample_hides_it_and_keeps_reason() {
    let service = create_service().await;
    let ctx = admin();
    let gxp = seed_type(&service, "GXP", LabTestGroup::Bacteriology, true).await;
    let lab_test = seed_test(&service, gxp.id.unwrap(), 7, 1, NEW_YEAR).await;
    let sample = seed_sample(
        &service,
        lab_test.id.unwrap(),
        7,
        LabTestSampleStatus::Collected,
        datetime!(2024-01-05 09:00 UTC),
    )
    .await;

    let voided = service.void_sample(&ctx, sample, "haemolysed").await.unwrap();

    let filter = SampleFilter::for_patient(7);
    assert!(service.list_samples(&ctx, &filter, false).await.unwrap().is_empty());
    let stored = service.get_sample_by_uuid(&ctx, voided.uuid).await.unwrap().unwrap();
    assert_eq!(stored.voided.as_ref().map(|d| d.reason.as_str()), Some("haemolysed"));
    assert!(service.get_earliest_sample(&ctx, 7, None).await.unwrap().is_none());

    let restored = service.unvoid_sample(&ctx, stored).await.unwrap();
    assert!(restored.is_active());
    assert_eq!(service.list_samples(&ctx, &filter, false).await.unwrap().len(), 1);

    service.delete_sample(&ctx, &restored).await.unwrap();
    assert!(service.get_sample(&ctx, restored.id.unwrap()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_attribute_filters_by_patient_and_type() {
    let service = create_service().await;
    let ctx = admin();
    let gxp = seed_type(&service, "GXP", LabTestGroup::Bacteriology, true).await;
    let mtb = seed_attribute_type(&service, "MTB", gxp.id.unwrap()).await;
    let rif = seed_attribute_type(&service, "RIF", gxp.id.unwrap()).await;
    let of_7 = seed_test(&service, gxp.id.unwrap(), 7, 1, NEW_YEAR).await;
    let of_8 = seed_test(&service, gxp.id.unwrap(), 8, 2, NEW_YEAR).await;

    let saved = service
        .save_attributes(
            &ctx,
            vec![
                LabTestAttribute::new(mtb.id.unwrap(), "detected").for_lab_test(of_7.id.unwrap()),
                LabTestAttribute::new(rif.id.unwrap(), "negative").for_lab_test(of_7.id.unwrap()),
                LabTestAttribute::new(mtb.id.unwrap(), "detected").for_lab_test(of_8.id.unwrap()),
            ],
        )
        .await
        .unwrap();
    let [mtb_7, rif_7, mtb_8] = [&saved[0], &saved[1], &saved[2]].map(|a| a.id.unwrap());

    assert_eq!(
        ids(&service.list_attributes_by_patient(&ctx, 7, false).await.unwrap()),
        [mtb_7, rif_7]
    );
    assert_eq!(
        ids(&service.list_attributes_by_type(&ctx, mtb.id.unwrap(), false).await.unwrap()),
        [mtb_7, mtb_8]
    );
    assert_eq!(
        ids(&service
            .list_attributes_by_patient_and_type(&ctx, 8, mtb.id.unwrap(), false)
            .await
            .unwrap()),
        [mtb_8]
    );

    let by_value = AttributeFilter {
        value_reference: Some("negative".to_owned()),
        ..AttributeFilter::default()
    };
    assert_eq!(
        ids(&service.list_attributes(&ctx, &by_value, false).await.unwrap()),
        [rif_7]
    );
}

#[tokio::test]
async fn test_void_and_delete_attribute() {
    let service = create_service().await;
    let ctx = admin();
    let gxp = seed_type(&service, "GXP", LabTestGroup::Bacteriology, true).await;
    let mtb = seed_attribute_type(&service, "MTB", gxp.id.unwrap()).await;
    let lab_test = seed_test(&service, gxp.id.unwrap(), 7, 1, NEW_YEAR).await;
    let attribute = service
        .save_attribute(
            &ctx,
            LabTestAttribute::new(mtb.id.unwrap(), "detected").for_lab_test(lab_test.id.unwrap()),
        )
        .await
        .unwrap();

    let voided = service
        .void_attribute(&ctx, attribute, "entered in error")
        .await
        .unwrap();
    assert!(service.list_attributes_by_patient(&ctx, 7, false).await.unwrap().is_empty());
    assert_eq!(service.list_attributes_by_patient(&ctx, 7, true).await.unwrap().len(), 1);

    let restored = service.unvoid_attribute(&ctx, voided).await.unwrap();
    assert!(restored.is_active());

    service.delete_attribute(&ctx, &restored).await.unwrap();
    assert!(service.get_attribute(&ctx, restored.id.unwrap()).await.unwrap().is_none());
}
