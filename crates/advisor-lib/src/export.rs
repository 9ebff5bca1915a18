//! CSV rendering of recommendations

use crate::catalog::Catalog;
use crate::error::ExportError;
use crate::models::{Profile, Recommendation};

/// Suggested file name for downloads
pub const DEFAULT_CSV_FILENAME: &str = "postgresql_recommendations.csv";

/// Which profiles to include in an export
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProfileSelection {
    #[default]
    All,
    Single(Profile),
}

impl ProfileSelection {
    pub fn profiles(&self) -> Vec<Profile> {
        match self {
            ProfileSelection::All => Profile::ALL.to_vec(),
            ProfileSelection::Single(p) => vec![*p],
        }
    }
}

impl From<Option<Profile>> for ProfileSelection {
    fn from(profile: Option<Profile>) -> Self {
        profile.map_or(ProfileSelection::All, ProfileSelection::Single)
    }
}

/// Render one row per parameter with a column per selected profile
pub fn to_csv(
    recommendation: &Recommendation,
    selection: ProfileSelection,
) -> Result<String, ExportError> {
    let profiles = selection.profiles();
    let mut writer = csv::Writer::from_writer(Vec::new());

    let mut header = vec!["Parameter".to_string()];
    header.extend(profiles.iter().map(|p| format!("{} Profile", p.label())));
    header.push("Apply Type".to_string());
    writer.write_record(&header)?;

    // Parameter order and apply types are identical across profiles
    for entry in &recommendation.conservative {
        let mut row = vec![entry.name.clone()];
        for profile in &profiles {
            let value = recommendation
                .profile(*profile)
                .value(&entry.name)
                .unwrap_or_default();
            row.push(value.to_string());
        }
        row.push(entry.apply_type.to_string());
        writer.write_record(&row)?;
    }

    finish(writer)
}

/// One `resource,value` row per catalog option
pub fn catalog_to_csv(catalog: &Catalog) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(["resource", "value"])?;
    for cpu in &catalog.cpu_options {
        writer.write_record(["cpu_count", &cpu.to_string()])?;
    }
    for memory in &catalog.memory_options_gb {
        writer.write_record(["memory_gb", &memory.to_string()])?;
    }
    finish(writer)
}

fn finish(writer: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let bytes = writer
        .into_inner()
        .map_err(|e| ExportError::Flush(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{recommend, PARAMETERS};
    use crate::models::{SizingInput, WorkloadRole};

    fn sample() -> Recommendation {
        recommend(SizingInput::new(32, 128).unwrap(), WorkloadRole::Olap).unwrap()
    }

    #[test]
    fn test_all_profiles_layout() {
        let csv = to_csv(&sample(), ProfileSelection::All).unwrap();
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(
            lines[0],
            "Parameter,Conservative Profile,Balanced Profile,Aggressive Profile,Apply Type"
        );
        assert_eq!(lines.len(), PARAMETERS.len() + 1);
        assert_eq!(lines[1], "shared_buffers,32768MB,40960MB,52428MB,static");
    }

    #[test]
    fn test_single_profile_layout() {
        let selection = ProfileSelection::from(Some(Profile::Aggressive));
        let csv = to_csv(&sample(), selection).unwrap();
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some("Parameter,Aggressive Profile,Apply Type"));
        assert_eq!(lines.next(), Some("shared_buffers,52428MB,static"));
        assert!(csv.contains("autovacuum,ON,dynamic"));
    }

    #[test]
    fn test_catalog_rows() {
        let csv = catalog_to_csv(&Catalog::for_role(Some(WorkloadRole::Olap))).unwrap();
        let mut lines = csv.lines();

        assert_eq!(lines.next(), Some("resource,value"));
        assert_eq!(lines.next(), Some("cpu_count,8"));
        assert!(csv.contains("memory_gb,1832\n"));
        assert!(!csv.contains("memory_gb,4\n"));
    }

    #[test]
    fn test_selection_from_none_is_all() {
        assert_eq!(ProfileSelection::from(None), ProfileSelection::All);
        assert_eq!(ProfileSelection::All.profiles().len(), 3);
    }
}
