use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::FieldCatalog;

/// A job listing as stored and as returned by the API.
///
/// Serialized field names are camelCase; they are the names clients use in
/// filters, `sort` and `fields`.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "jobs")]
#[serde(rename_all = "camelCase")]
#[schema(as = Job)]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    #[sea_orm(column_type = "Text")]
    pub description: String,
    pub email: Option<String>,
    pub address: String,
    pub company: String,
    pub industry: Industry,
    pub job_type: JobType,
    pub min_education: Education,
    pub positions: i32,
    pub experience: Experience,
    pub salary: i64,
    pub posting_date: DateTime<Utc>,
    pub last_date: DateTime<Utc>,
    /// Revision counter, bumped on every update.
    pub version: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl FieldCatalog for Entity {
    fn fields() -> Vec<(&'static str, Self::Column)> {
        vec![
            ("id", Column::Id),
            ("title", Column::Title),
            ("slug", Column::Slug),
            ("description", Column::Description),
            ("email", Column::Email),
            ("address", Column::Address),
            ("company", Column::Company),
            ("industry", Column::Industry),
            ("jobType", Column::JobType),
            ("minEducation", Column::MinEducation),
            ("positions", Column::Positions),
            ("experience", Column::Experience),
            ("salary", Column::Salary),
            ("postingDate", Column::PostingDate),
            ("lastDate", Column::LastDate),
            ("version", Column::Version),
        ]
    }

    fn text_fields() -> Vec<Self::Column> {
        vec![Column::Title]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Industry {
    #[sea_orm(string_value = "Business")]
    Business,
    #[sea_orm(string_value = "IT")]
    #[serde(rename = "IT")]
    It,
    #[sea_orm(string_value = "Banking")]
    Banking,
    #[sea_orm(string_value = "Education/Training")]
    #[serde(rename = "Education/Training")]
    EducationTraining,
    #[sea_orm(string_value = "Telecommunication")]
    Telecommunication,
    #[sea_orm(string_value = "Others")]
    Others,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum JobType {
    #[sea_orm(string_value = "Permanent")]
    Permanent,
    #[sea_orm(string_value = "Temporary")]
    Temporary,
    #[sea_orm(string_value = "Internship")]
    Internship,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Education {
    #[sea_orm(string_value = "Bachelors")]
    Bachelors,
    #[sea_orm(string_value = "Masters")]
    Masters,
    #[sea_orm(string_value = "PhD")]
    PhD,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize, ToSchema)]
#[sea_orm(rs_type = "String", db_type = "Text")]
pub enum Experience {
    #[sea_orm(string_value = "No Experience")]
    #[serde(rename = "No Experience")]
    NoExperience,
    #[sea_orm(string_value = "1-2 yrs")]
    #[serde(rename = "1-2 yrs")]
    OneToTwoYears,
    #[sea_orm(string_value = "2-5 yrs")]
    #[serde(rename = "2-5 yrs")]
    TwoToFiveYears,
    #[sea_orm(string_value = "5 years+")]
    #[serde(rename = "5 years+")]
    FiveYearsPlus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_enum_labels_round_trip_through_serde() {
        assert_eq!(serde_json::to_value(Experience::OneToTwoYears).unwrap(), json!("1-2 yrs"));
        assert_eq!(serde_json::to_value(Industry::EducationTraining).unwrap(), json!("Education/Training"));
        assert_eq!(
            serde_json::from_value::<Industry>(json!("IT")).unwrap(),
            Industry::It
        );
        assert!(serde_json::from_value::<JobType>(json!("Contract")).is_err());
    }

    #[test]
    fn test_every_serialized_field_is_in_the_catalog() {
        let model = Model {
            id: Uuid::nil(),
            title: "t".into(),
            slug: "t".into(),
            description: "d".into(),
            email: None,
            address: "a".into(),
            company: "c".into(),
            industry: Industry::It,
            job_type: JobType::Permanent,
            min_education: Education::Bachelors,
            positions: 1,
            experience: Experience::NoExperience,
            salary: 1,
            posting_date: Utc::now(),
            last_date: Utc::now(),
            version: 0,
        };
        let serialized = serde_json::to_value(model).unwrap();
        let catalog: Vec<&str> = Entity::fields().into_iter().map(|(name, _)| name).collect();
        for key in serialized.as_object().unwrap().keys() {
            assert!(catalog.contains(&key.as_str()), "{key} missing from catalog");
        }
        assert_eq!(catalog.len(), serialized.as_object().unwrap().len());
    }
}
