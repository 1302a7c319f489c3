//! Nation reference model.

use serde::{Deserialize, Serialize};

use super::NationId;

/// A competing nation with backend-computed totals.
///
/// The backend serializes the display name as `nation`; totals may be
/// missing or `null` for a freshly created nation and default to zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Nation {
    pub id: NationId,

    #[serde(rename = "nation")]
    pub name: String,

    #[serde(default)]
    pub image_name: Option<String>,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub total_members: u32,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub total_mentors: u32,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub total_secretaries: u32,

    #[serde(default, deserialize_with = "zero_if_null")]
    pub total_points: i64,
}

fn zero_if_null<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl Nation {
    pub fn new(id: NationId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            image_name: None,
            total_members: 0,
            total_mentors: 0,
            total_secretaries: 0,
            total_points: 0,
        }
    }

    pub fn with_total_points(mut self, points: i64) -> Self {
        self.total_points = points;
        self
    }
}

/// Leading nation names per period for one address, as reported by the
/// backend. Periods without data are `None`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopPerformers {
    pub top_week: Option<String>,
    pub top_month: Option<String>,
    pub top_year: Option<String>,
}

impl TopPerformers {
    pub fn is_empty(&self) -> bool {
        self.top_week.is_none() && self.top_month.is_none() && self.top_year.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nation_deserialize_backend_shape() {
        let json = r#"{
            "id": 3,
            "nation": "Revolution",
            "imageName": "rev.png",
            "totalMembers": 40,
            "totalMentors": 4,
            "totalSecretaries": 2,
            "totalPoints": 1250
        }"#;

        let nation: Nation = serde_json::from_str(json).unwrap();
        assert_eq!(nation.id, NationId::new(3));
        assert_eq!(nation.name, "Revolution");
        assert_eq!(nation.image_name.as_deref(), Some("rev.png"));
        assert_eq!(nation.total_members, 40);
        assert_eq!(nation.total_points, 1250);
    }

    #[test]
    fn test_nation_missing_and_null_totals_default_to_zero() {
        let json = r#"{"id": 1, "nation": "Impact", "totalPoints": null, "extra": true}"#;
        let nation: Nation = serde_json::from_str(json).unwrap();

        assert_eq!(nation.total_points, 0);
        assert_eq!(nation.total_members, 0);
        assert_eq!(nation.total_mentors, 0);
        assert!(nation.image_name.is_none());
    }

    #[test]
    fn test_nation_builder() {
        let nation = Nation::new(NationId::new(2), "Flawless").with_total_points(90);
        assert_eq!(nation.total_points, 90);
        assert_eq!(nation.total_secretaries, 0);
    }

    #[test]
    fn test_top_performers_from_backend() {
        let json = r#"{"topWeek": "Impact", "topMonth": "Flawless", "topYear": null}"#;
        let top: TopPerformers = serde_json::from_str(json).unwrap();

        assert_eq!(top.top_week.as_deref(), Some("Impact"));
        assert_eq!(top.top_month.as_deref(), Some("Flawless"));
        assert!(top.top_year.is_none());
        assert!(!top.is_empty());

        let empty: TopPerformers = serde_json::from_str("{}").unwrap();
        assert!(empty.is_empty());
    }
}
