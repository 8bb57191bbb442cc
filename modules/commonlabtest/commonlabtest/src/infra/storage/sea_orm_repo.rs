use std::collections::HashMap;

use async_trait::async_trait;
use commonlabtest_sdk::{
    AttributeFilter, AttributeTypeFilter, LabTest, LabTestAttribute, LabTestAttributeType,
    LabTestFilter, LabTestSample, LabTestType, LabTestTypeFilter, SampleFilter, SortOrder,
};
use sea_orm::sea_query::Query;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, Order, QueryFilter,
    QueryOrder, QuerySelect,
};
use uuid::Uuid;

use super::db::{contains_literal, db_err, utc};
use super::entity::{
    lab_test, lab_test_attribute, lab_test_attribute_type, lab_test_sample, lab_test_type,
};
use crate::domain::error::DomainError;
use crate::domain::repo::CommonLabTestRepository;

/// `SeaORM` implementation of the repository port.
///
/// Stateless: every call runs on the connection or transaction it is handed.
#[derive(Debug, Default, Clone, Copy)]
pub struct SeaOrmLabTestRepository;

impl SeaOrmLabTestRepository {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn sort(order: SortOrder) -> Order {
    match order {
        SortOrder::Ascending => Order::Asc,
        SortOrder::Descending => Order::Desc,
    }
}

/// Converts lab test rows, loading every attribute they own (voided ones too)
/// with one extra query.
async fn with_attributes<C: ConnectionTrait>(
    runner: &C,
    rows: Vec<lab_test::Model>,
) -> Result<Vec<LabTest>, DomainError> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = rows.iter().map(|r| r.id).collect();
    let mut owned: HashMap<i32, Vec<LabTestAttribute>> = HashMap::new();
    for row in lab_test_attribute::Entity::find()
        .filter(lab_test_attribute::Column::LabTestId.is_in(ids))
        .order_by_asc(lab_test_attribute::Column::Id)
        .all(runner)
        .await
        .map_err(db_err)?
    {
        owned.entry(row.lab_test_id).or_default().push(row.into());
    }

    Ok(rows
        .into_iter()
        .map(|row| {
            let attributes = owned.remove(&row.id).unwrap_or_default();
            LabTest {
                attributes,
                ..LabTest::from(row)
            }
        })
        .collect())
}

fn lab_test_type_condition(filter: &LabTestTypeFilter, include_inactive: bool) -> Condition {
    use lab_test_type::Column;

    let mut cond = Condition::all();
    if let Some(name) = &filter.name {
        cond = cond.add(contains_literal(Column::Name, name));
    }
    if let Some(short_name) = &filter.short_name {
        cond = cond.add(contains_literal(Column::ShortName, short_name));
    }
    if let Some(group) = filter.test_group {
        cond = cond.add(Column::TestGroup.eq(group.as_str()));
    }
    if let Some(concept_id) = filter.reference_concept_id {
        cond = cond.add(Column::ReferenceConceptId.eq(concept_id));
    }
    if !include_inactive {
        cond = cond.add(Column::Retired.eq(false));
    }
    cond
}

fn attribute_type_condition(filter: &AttributeTypeFilter, include_inactive: bool) -> Condition {
    use lab_test_attribute_type::Column;

    let mut cond = Condition::all();
    if let Some(name) = &filter.name {
        cond = cond.add(contains_literal(Column::Name, name));
    }
    if let Some(datatype) = &filter.datatype_classname {
        cond = cond.add(Column::DatatypeClassname.eq(datatype.as_str()));
    }
    if let Some(lab_test_type_id) = filter.lab_test_type_id {
        cond = cond.add(Column::LabTestTypeId.eq(lab_test_type_id));
    }
    if !include_inactive {
        cond = cond.add(Column::Retired.eq(false));
    }
    cond
}

fn lab_test_condition(filter: &LabTestFilter, include_inactive: bool) -> Condition {
    use lab_test::Column;

    let mut cond = Condition::all();
    if let Some(type_id) = filter.lab_test_type_id {
        cond = cond.add(Column::LabTestTypeId.eq(type_id));
    }
    if let Some(patient_id) = filter.patient_id {
        cond = cond.add(Column::PatientId.eq(patient_id));
    }
    if let Some(sample_id) = filter.sample_id {
        cond = cond.add(
            Column::Id.in_subquery(
                Query::select()
                    .column(lab_test_sample::Column::LabTestId)
                    .from(lab_test_sample::Entity)
                    .and_where(lab_test_sample::Column::Id.eq(sample_id))
                    .to_owned(),
            ),
        );
    }
    if let Some(order_number) = &filter.order_number {
        cond = cond.add(Column::OrderNumber.eq(order_number.as_str()));
    }
    if let Some(reference) = &filter.reference_number {
        cond = cond.add(contains_literal(Column::LabReferenceNumber, reference));
    }
    if let Some(concept_id) = filter.order_concept_id {
        cond = cond.add(Column::OrderConceptId.eq(concept_id));
    }
    if let Some(orderer_id) = filter.orderer_id {
        cond = cond.add(Column::OrdererId.eq(orderer_id));
    }
    if let Some(encounter_id) = filter.encounter_id {
        cond = cond.add(Column::EncounterId.eq(encounter_id));
    }
    if let Some(order_id) = filter.order_id {
        cond = cond.add(Column::OrderId.eq(order_id));
    }
    if let Some(from) = filter.from {
        cond = cond.add(Column::DateCreated.gte(utc(from)));
    }
    if let Some(to) = filter.to {
        cond = cond.add(Column::DateCreated.lte(utc(to)));
    }
    if !include_inactive {
        cond = cond.add(Column::Voided.eq(false));
    }
    cond
}

fn sample_condition(filter: &SampleFilter, include_inactive: bool) -> Condition {
    use lab_test_sample::Column;

    let mut cond = Condition::all();
    if let Some(lab_test_id) = filter.lab_test_id {
        cond = cond.add(Column::LabTestId.eq(lab_test_id));
    }
    if let Some(patient_id) = filter.patient_id {
        cond = cond.add(Column::PatientId.eq(patient_id));
    }
    if let Some(status) = filter.status {
        cond = cond.add(Column::Status.eq(status.as_str()));
    }
    if let Some(identifier) = &filter.sample_identifier {
        cond = cond.add(Column::LabSampleIdentifier.eq(identifier.as_str()));
    }
    if let Some(specimen) = &filter.specimen_name {
        cond = cond.add(Column::SpecimenName.eq(specimen.as_str()));
    }
    if let Some(collector_id) = filter.collector_id {
        cond = cond.add(Column::CollectorId.eq(collector_id));
    }
    if let Some(from) = filter.from {
        cond = cond.add(Column::CollectionDate.gte(utc(from)));
    }
    if let Some(to) = filter.to {
        cond = cond.add(Column::CollectionDate.lte(utc(to)));
    }

    // Order fields live on the owning lab test.
    let mut owner = Condition::all();
    if let Some(order_id) = filter.order_id {
        owner = owner.add(lab_test::Column::OrderId.eq(order_id));
    }
    if let Some(order_number) = &filter.order_number {
        owner = owner.add(lab_test::Column::OrderNumber.eq(order_number.as_str()));
    }
    if let Some(reference) = &filter.reference_number {
        owner = owner.add(contains_literal(lab_test::Column::LabReferenceNumber, reference));
    }
    if !owner.is_empty() {
        cond = cond.add(
            Column::LabTestId.in_subquery(
                Query::select()
                    .column(lab_test::Column::Id)
                    .from(lab_test::Entity)
                    .cond_where(owner)
                    .to_owned(),
            ),
        );
    }

    if !include_inactive {
        cond = cond.add(Column::Voided.eq(false));
    }
    cond
}

fn attribute_condition(filter: &AttributeFilter, include_inactive: bool) -> Condition {
    use lab_test_attribute::Column;

    let mut cond = Condition::all();
    if let Some(type_id) = filter.attribute_type_id {
        cond = cond.add(Column::AttributeTypeId.eq(type_id));
    }
    if let Some(lab_test_id) = filter.lab_test_id {
        cond = cond.add(Column::LabTestId.eq(lab_test_id));
    }
    if let Some(patient_id) = filter.patient_id {
        cond = cond.add(
            Column::LabTestId.in_subquery(
                Query::select()
                    .column(lab_test::Column::Id)
                    .from(lab_test::Entity)
                    .and_where(lab_test::Column::PatientId.eq(patient_id))
                    .to_owned(),
            ),
        );
    }
    if let Some(value) = &filter.value_reference {
        cond = cond.add(Column::ValueReference.eq(value.as_str()));
    }
    if let Some(from) = filter.from {
        cond = cond.add(Column::DateCreated.gte(utc(from)));
    }
    if let Some(to) = filter.to {
        cond = cond.add(Column::DateCreated.lte(utc(to)));
    }
    if !include_inactive {
        cond = cond.add(Column::Voided.eq(false));
    }
    cond
}

#[async_trait]
impl CommonLabTestRepository for SeaOrmLabTestRepository {
    async fn find_lab_test_type<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<Option<LabTestType>, DomainError> {
        lab_test_type::Entity::find_by_id(id)
            .one(runner)
            .await
            .map_err(db_err)?
            .map(LabTestType::try_from)
            .transpose()
    }

    async fn find_lab_test_type_by_uuid<C: ConnectionTrait>(
        &self,
        runner: &C,
        uuid: Uuid,
    ) -> Result<Option<LabTestType>, DomainError> {
        lab_test_type::Entity::find()
            .filter(lab_test_type::Column::Uuid.eq(uuid))
            .one(runner)
            .await
            .map_err(db_err)?
            .map(LabTestType::try_from)
            .transpose()
    }

    async fn list_lab_test_types<C: ConnectionTrait>(
        &self,
        runner: &C,
        filter: &LabTestTypeFilter,
        include_inactive: bool,
    ) -> Result<Vec<LabTestType>, DomainError> {
        lab_test_type::Entity::find()
            .filter(lab_test_type_condition(filter, include_inactive))
            .order_by_asc(lab_test_type::Column::Id)
            .all(runner)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(LabTestType::try_from)
            .collect()
    }

    async fn save_lab_test_type<C: ConnectionTrait>(
        &self,
        runner: &C,
        lab_test_type: LabTestType,
    ) -> Result<LabTestType, DomainError> {
        let active = lab_test_type::ActiveModel::from(&lab_test_type);
        let saved = if lab_test_type.id.is_some() {
            active.update(runner).await
        } else {
            active.insert(runner).await
        }
        .map_err(db_err)?;
        LabTestType::try_from(saved)
    }

    async fn purge_lab_test_type<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<(), DomainError> {
        lab_test_type::Entity::delete_by_id(id)
            .exec(runner)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_attribute_type<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<Option<LabTestAttributeType>, DomainError> {
        let found = lab_test_attribute_type::Entity::find_by_id(id)
            .one(runner)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn find_attribute_type_by_uuid<C: ConnectionTrait>(
        &self,
        runner: &C,
        uuid: Uuid,
    ) -> Result<Option<LabTestAttributeType>, DomainError> {
        let found = lab_test_attribute_type::Entity::find()
            .filter(lab_test_attribute_type::Column::Uuid.eq(uuid))
            .one(runner)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn list_attribute_types<C: ConnectionTrait>(
        &self,
        runner: &C,
        filter: &AttributeTypeFilter,
        include_inactive: bool,
    ) -> Result<Vec<LabTestAttributeType>, DomainError> {
        let rows = lab_test_attribute_type::Entity::find()
            .filter(attribute_type_condition(filter, include_inactive))
            .order_by_asc(lab_test_attribute_type::Column::Id)
            .all(runner)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn save_attribute_type<C: ConnectionTrait>(
        &self,
        runner: &C,
        attribute_type: LabTestAttributeType,
    ) -> Result<LabTestAttributeType, DomainError> {
        let active = lab_test_attribute_type::ActiveModel::from(&attribute_type);
        let saved = if attribute_type.id.is_some() {
            active.update(runner).await
        } else {
            active.insert(runner).await
        }
        .map_err(db_err)?;
        Ok(saved.into())
    }

    async fn purge_attribute_type<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<(), DomainError> {
        lab_test_attribute_type::Entity::delete_by_id(id)
            .exec(runner)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_lab_test<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<Option<LabTest>, DomainError> {
        let found = lab_test::Entity::find_by_id(id)
            .one(runner)
            .await
            .map_err(db_err)?;
        Ok(with_attributes(runner, found.into_iter().collect())
            .await?
            .pop())
    }

    async fn find_lab_test_by_uuid<C: ConnectionTrait>(
        &self,
        runner: &C,
        uuid: Uuid,
    ) -> Result<Option<LabTest>, DomainError> {
        let found = lab_test::Entity::find()
            .filter(lab_test::Column::Uuid.eq(uuid))
            .one(runner)
            .await
            .map_err(db_err)?;
        Ok(with_attributes(runner, found.into_iter().collect())
            .await?
            .pop())
    }

    async fn list_lab_tests<C: ConnectionTrait>(
        &self,
        runner: &C,
        filter: &LabTestFilter,
        include_inactive: bool,
    ) -> Result<Vec<LabTest>, DomainError> {
        let rows = lab_test::Entity::find()
            .filter(lab_test_condition(filter, include_inactive))
            .order_by_asc(lab_test::Column::Id)
            .all(runner)
            .await
            .map_err(db_err)?;
        with_attributes(runner, rows).await
    }

    async fn find_lab_tests_limited<C: ConnectionTrait>(
        &self,
        runner: &C,
        filter: &LabTestFilter,
        limit: u64,
        order: SortOrder,
    ) -> Result<Vec<LabTest>, DomainError> {
        let rows = lab_test::Entity::find()
            .filter(lab_test_condition(filter, false))
            .order_by(lab_test::Column::DateCreated, sort(order))
            .order_by(lab_test::Column::Id, sort(order))
            .limit(limit)
            .all(runner)
            .await
            .map_err(db_err)?;
        with_attributes(runner, rows).await
    }

    async fn save_lab_test<C: ConnectionTrait>(
        &self,
        runner: &C,
        lab_test: LabTest,
    ) -> Result<LabTest, DomainError> {
        let active = lab_test::ActiveModel::from(&lab_test);
        let saved = if lab_test.id.is_some() {
            active.update(runner).await
        } else {
            active.insert(runner).await
        }
        .map_err(db_err)?;
        Ok(saved.into())
    }

    async fn purge_lab_test<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<(), DomainError> {
        lab_test_attribute::Entity::delete_many()
            .filter(lab_test_attribute::Column::LabTestId.eq(id))
            .exec(runner)
            .await
            .map_err(db_err)?;
        lab_test_sample::Entity::delete_many()
            .filter(lab_test_sample::Column::LabTestId.eq(id))
            .exec(runner)
            .await
            .map_err(db_err)?;
        lab_test::Entity::delete_by_id(id)
            .exec(runner)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_sample<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<Option<LabTestSample>, DomainError> {
        lab_test_sample::Entity::find_by_id(id)
            .one(runner)
            .await
            .map_err(db_err)?
            .map(LabTestSample::try_from)
            .transpose()
    }

    async fn find_sample_by_uuid<C: ConnectionTrait>(
        &self,
        runner: &C,
        uuid: Uuid,
    ) -> Result<Option<LabTestSample>, DomainError> {
        lab_test_sample::Entity::find()
            .filter(lab_test_sample::Column::Uuid.eq(uuid))
            .one(runner)
            .await
            .map_err(db_err)?
            .map(LabTestSample::try_from)
            .transpose()
    }

    async fn list_samples<C: ConnectionTrait>(
        &self,
        runner: &C,
        filter: &SampleFilter,
        include_inactive: bool,
    ) -> Result<Vec<LabTestSample>, DomainError> {
        lab_test_sample::Entity::find()
            .filter(sample_condition(filter, include_inactive))
            .order_by_asc(lab_test_sample::Column::Id)
            .all(runner)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(LabTestSample::try_from)
            .collect()
    }

    async fn find_samples_limited<C: ConnectionTrait>(
        &self,
        runner: &C,
        filter: &SampleFilter,
        limit: u64,
        order: SortOrder,
    ) -> Result<Vec<LabTestSample>, DomainError> {
        lab_test_sample::Entity::find()
            .filter(sample_condition(filter, false))
            .order_by(lab_test_sample::Column::CollectionDate, sort(order))
            .order_by(lab_test_sample::Column::Id, sort(order))
            .limit(limit)
            .all(runner)
            .await
            .map_err(db_err)?
            .into_iter()
            .map(LabTestSample::try_from)
            .collect()
    }

    async fn save_sample<C: ConnectionTrait>(
        &self,
        runner: &C,
        sample: LabTestSample,
    ) -> Result<LabTestSample, DomainError> {
        let active = lab_test_sample::ActiveModel::from(&sample);
        let saved = if sample.id.is_some() {
            active.update(runner).await
        } else {
            active.insert(runner).await
        }
        .map_err(db_err)?;
        LabTestSample::try_from(saved)
    }

    async fn purge_sample<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<(), DomainError> {
        lab_test_sample::Entity::delete_by_id(id)
            .exec(runner)
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_attribute<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<Option<LabTestAttribute>, DomainError> {
        let found = lab_test_attribute::Entity::find_by_id(id)
            .one(runner)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn find_attribute_by_uuid<C: ConnectionTrait>(
        &self,
        runner: &C,
        uuid: Uuid,
    ) -> Result<Option<LabTestAttribute>, DomainError> {
        let found = lab_test_attribute::Entity::find()
            .filter(lab_test_attribute::Column::Uuid.eq(uuid))
            .one(runner)
            .await
            .map_err(db_err)?;
        Ok(found.map(Into::into))
    }

    async fn list_attributes<C: ConnectionTrait>(
        &self,
        runner: &C,
        filter: &AttributeFilter,
        include_inactive: bool,
    ) -> Result<Vec<LabTestAttribute>, DomainError> {
        let rows = lab_test_attribute::Entity::find()
            .filter(attribute_condition(filter, include_inactive))
            .order_by_asc(lab_test_attribute::Column::Id)
            .all(runner)
            .await
            .map_err(db_err)?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn save_attribute<C: ConnectionTrait>(
        &self,
        runner: &C,
        attribute: LabTestAttribute,
    ) -> Result<LabTestAttribute, DomainError> {
        let active = lab_test_attribute::ActiveModel::try_from(&attribute)?;
        let saved = if attribute.id.is_some() {
            active.update(runner).await
        } else {
            active.insert(runner).await
        }
        .map_err(db_err)?;
        Ok(saved.into())
    }

    async fn purge_attribute<C: ConnectionTrait>(
        &self,
        runner: &C,
        id: i32,
    ) -> Result<(), DomainError> {
        lab_test_attribute::Entity::delete_by_id(id)
            .exec(runner)
            .await
            .map_err(db_err)?;
        Ok(())
    }
}
