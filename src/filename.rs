// 🏷️ Filename convention - `sales_qn_yyyy_r.csv`
//
// Only the shape is checked: total length, the `sales_q` prefix, the two
// separators and the extension. Quarter and year digits are not validated here.

use anyhow::{bail, Result};

/// Template every import file name must follow
pub const NAMING_CONVENTION: &str = "sales_qn_yyyy_r.csv";

const PREFIX_LEN: usize = 7;
const EXTENSION_LEN: usize = 4;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamingConvention {
    template: String,
}

impl Default for NamingConvention {
    fn default() -> Self {
        NamingConvention {
            template: NAMING_CONVENTION.to_string(),
        }
    }
}

impl NamingConvention {
    /// Build a convention from a template shaped like `sales_qn_yyyy_r.csv`
    pub fn new(template: &str) -> Result<Self> {
        if !template.is_ascii() || template.len() < PREFIX_LEN + EXTENSION_LEN + 3 {
            bail!("Naming convention '{}' is too short or not ASCII", template);
        }
        Ok(NamingConvention {
            template: template.to_string(),
        })
    }

    pub fn template(&self) -> &str {
        &self.template
    }

    /// True if `filename` has the template's length and fixed characters
    pub fn is_valid_filename_format(&self, filename: &str) -> bool {
        let name = filename.as_bytes();
        let template = self.template.as_bytes();
        let len = template.len();

        // Separator before the region code: 6th character from the end
        let region_separator = len - 6;

        name.len() == len
            && name[..PREFIX_LEN] == template[..PREFIX_LEN]
            && name[PREFIX_LEN + 1] == template[PREFIX_LEN + 1]
            && name[region_separator] == template[region_separator]
            && name[len - EXTENSION_LEN..] == template[len - EXTENSION_LEN..]
    }

    /// Lower-cased region code: the character right before the extension.
    ///
    /// `None` when the filename does not follow the convention.
    pub fn get_region_code(&self, filename: &str) -> Option<String> {
        if !self.is_valid_filename_format(filename) {
            return None;
        }
        let end = filename.len() - EXTENSION_LEN;
        filename.get(end - 1..end).map(|code| code.to_lowercase())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_filename() {
        let naming = NamingConvention::default();
        assert!(naming.is_valid_filename_format("sales_q1_2021_w.csv"));
        assert_eq!(naming.get_region_code("sales_q1_2021_w.csv"), Some("w".to_string()));
    }

    #[test]
    fn test_region_code_is_lower_cased() {
        let naming = NamingConvention::default();
        assert_eq!(naming.get_region_code("sales_q3_2022_E.csv"), Some("e".to_string()));
    }

    #[test]
    fn test_wrong_length_is_invalid() {
        let naming = NamingConvention::default();
        assert!(!naming.is_valid_filename_format("sales_q1_2021_ww.csv"));
        assert_eq!(naming.get_region_code("sales_q1_2021_ww.csv"), None);
    }

    #[test]
    fn test_unrelated_name_is_invalid() {
        let naming = NamingConvention::default();
        assert!(!naming.is_valid_filename_format("region1"));
        assert_eq!(naming.get_region_code("region1"), None);
        assert!(!naming.is_valid_filename_format(""));
    }

    #[test]
    fn test_fixed_positions_are_checked() {
        let naming = NamingConvention::default();
        assert!(!naming.is_valid_filename_format("sales_x1_2021_w.csv"), "prefix");
        assert!(!naming.is_valid_filename_format("sales_q1-2021_w.csv"), "separator after quarter");
        assert!(!naming.is_valid_filename_format("sales_q1_2021-w.csv"), "separator before region");
        assert!(!naming.is_valid_filename_format("sales_q1_2021_w.txt"), "extension");
    }

    #[test]
    fn test_quarter_and_year_are_not_validated() {
        let naming = NamingConvention::default();
        assert!(naming.is_valid_filename_format("sales_q9_abcd_x.csv"));
        assert_eq!(naming.get_region_code("sales_q9_abcd_x.csv"), Some("x".to_string()));
    }

    #[test]
    fn test_non_ascii_region_character() {
        let naming = NamingConvention::default();
        // 'é' is two bytes, one more than the template allows
        assert!(!naming.is_valid_filename_format("sales_q1_2021_é.csv"));
    }

    #[test]
    fn test_custom_template() {
        assert!(NamingConvention::new("short").is_err());
        let naming = NamingConvention::new("sales_qn_yy_r.csv").unwrap();
        assert!(naming.is_valid_filename_format("sales_q2_21_c.csv"));
        assert!(!naming.is_valid_filename_format("sales_q2_2021_c.csv"));
    }
}
