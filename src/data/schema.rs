use crate::error::LoadError;

/// What a spreadsheet column holds, inferred from its header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    Timestamp,
    MagneticField,
    ElectricField,
    PowerDensity,
    Source,
}

impl ColumnRole {
    pub const REQUIRED: [ColumnRole; 5] = [
        ColumnRole::Timestamp,
        ColumnRole::MagneticField,
        ColumnRole::ElectricField,
        ColumnRole::PowerDensity,
        ColumnRole::Source,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ColumnRole::Timestamp => "timestamp",
            ColumnRole::MagneticField => "magnetic_field",
            ColumnRole::ElectricField => "electric_field",
            ColumnRole::PowerDensity => "power_density",
            ColumnRole::Source => "source",
        }
    }
}

fn normalize(header: &str) -> String {
    header
        .trim()
        .to_lowercase()
        .replace("micro", "u")
        .replace(['\u{00B5}', '\u{03BC}'], "u")
        .replace('\u{00B2}', "2")
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_')
        .collect()
}

/// Infer the role of a column from its header text.
/// `index` and the mW/m² power column are recognised as unused.
pub fn infer_role(header: &str) -> Option<ColumnRole> {
    let h = normalize(header);

    if h.contains("uw/m2") || h == "powerdensity" {
        Some(ColumnRole::PowerDensity)
    } else if h.contains("mw/m2") || h == "index" || h.is_empty() {
        None
    } else if h == "mg" || h.contains("(mg)") || h.contains("magnetic") {
        Some(ColumnRole::MagneticField)
    } else if h == "v/m" || h.contains("(v/m)") || h.contains("electric") {
        Some(ColumnRole::ElectricField)
    } else if h.contains("date") || h.contains("time") {
        Some(ColumnRole::Timestamp)
    } else if h.contains("source") {
        Some(ColumnRole::Source)
    } else {
        None
    }
}

/// Column positions of the required fields within a header row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnMap {
    pub timestamp: usize,
    pub magnetic_field: usize,
    pub electric_field: usize,
    pub power_density: usize,
    pub source: usize,
}

impl ColumnMap {
    /// Resolve every required role; the first matching header wins.
    pub fn resolve(headers: &[String]) -> Result<Self, LoadError> {
        let find = |role: ColumnRole| headers.iter().position(|h| infer_role(h) == Some(role));

        let missing: Vec<String> = ColumnRole::REQUIRED
            .iter()
            .filter(|&&role| find(role).is_none())
            .map(|role| role.name().to_string())
            .collect();
        if !missing.is_empty() {
            return Err(LoadError::SchemaMismatch { missing });
        }

        let position = |role| find(role).ok_or_else(|| LoadError::SchemaMismatch {
            missing: vec![ColumnRole::name(&role).to_string()],
        });
        Ok(Self {
            timestamp: position(ColumnRole::Timestamp)?,
            magnetic_field: position(ColumnRole::MagneticField)?,
            electric_field: position(ColumnRole::ElectricField)?,
            power_density: position(ColumnRole::PowerDensity)?,
            source: position(ColumnRole::Source)?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn recognises_meter_export_headers() {
        assert_eq!(infer_role("microW/m2"), Some(ColumnRole::PowerDensity));
        assert_eq!(infer_role("EMF (\u{00B5}W/m\u{00B2})"), Some(ColumnRole::PowerDensity));
        assert_eq!(infer_role("mW/m2"), None);
        assert_eq!(infer_role("mG"), Some(ColumnRole::MagneticField));
        assert_eq!(infer_role("V/m"), Some(ColumnRole::ElectricField));
        assert_eq!(infer_role("Date/Time"), Some(ColumnRole::Timestamp));
        assert_eq!(infer_role("power_density"), Some(ColumnRole::PowerDensity));
        assert_eq!(infer_role("index"), None);
    }

    #[test]
    fn resolves_original_layout() {
        let map = ColumnMap::resolve(&headers(&[
            "index", "datetime", "mG", "V/m", "mW/m2", "microW/m2", "source",
        ]))
        .unwrap();
        assert_eq!(map.timestamp, 1);
        assert_eq!(map.power_density, 5);
        assert_eq!(map.source, 6);
    }

    #[test]
    fn reports_every_missing_column() {
        let err = ColumnMap::resolve(&headers(&["datetime", "mG"])).unwrap_err();
        match err {
            LoadError::SchemaMismatch { missing } => assert_eq!(
                missing,
                vec!["electric_field", "power_density", "source"]
            ),
            other => panic!("unexpected error: {other}"),
        }
    }
}
