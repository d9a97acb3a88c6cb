//! Submission forms - Typed input for the two quote entry points.
//!
//! Forms are normalized (trimmed, blank optionals dropped) and then validated with
//! `validator` before anything touches the database. Validation failures keep the
//! offending field paths so they can be reported back per field.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::{borrow::Cow, collections::BTreeMap};
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

/// Largest value a measurement can hold (five digits, one of them fractional).
const MAX_MEASUREMENT: Decimal = Decimal::from_parts(100_000, 0, 0, false, 1);

/// Contact details of the person asking for a quote.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate)]
pub struct ClientDetails {
    /// Full name; only stored when the phone number is new
    #[validate(length(min = 1, max = 200, message = "Enter your full name (up to 200 characters)."))]
    #[serde(default)]
    pub full_name: String,
    /// Phone number identifying the client
    #[validate(length(min = 1, max = 15, message = "Enter a phone number of up to 15 characters."))]
    #[serde(default)]
    pub phone_number: String,
    /// Optional email; only stored when the phone number is new
    #[validate(email(message = "Enter a valid email address."))]
    #[serde(default)]
    pub email: Option<String>,
}

impl ClientDetails {
    fn normalize(&mut self) {
        self.full_name = self.full_name.trim().to_string();
        self.phone_number = self.phone_number.trim().to_string();
        self.email = non_blank(self.email.take());
    }
}

/// A submitted measurement: a number, or whatever was sent in its place.
///
/// Anything that is not a number is kept so it can be reported against its field
/// instead of failing the whole body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MeasurementInput {
    /// A number, given as a JSON number or a numeric string
    Value(Decimal),
    /// Any other JSON value
    Invalid(serde_json::Value),
}

impl From<Decimal> for MeasurementInput {
    fn from(value: Decimal) -> Self {
        Self::Value(value)
    }
}

/// The six body measurements as submitted, in inches, plus notes.
///
/// Every measurement is required; a missing or non-numeric value is reported
/// under its own field by [`Validate`].
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MeasurementDetails {
    /// Chest
    #[serde(default)]
    pub chest: Option<MeasurementInput>,
    /// Waist
    #[serde(default)]
    pub waist: Option<MeasurementInput>,
    /// Hips
    #[serde(default)]
    pub hips: Option<MeasurementInput>,
    /// Shoulder
    #[serde(default)]
    pub shoulder: Option<MeasurementInput>,
    /// Sleeve length
    #[serde(default)]
    pub sleeve_length: Option<MeasurementInput>,
    /// Full length
    #[serde(default)]
    pub full_length: Option<MeasurementInput>,
    /// Notes about the measurements
    #[serde(default)]
    pub additional_notes: String,
}

/// A complete, valid set of measurements.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MeasurementValues {
    /// Chest
    pub chest: Decimal,
    /// Waist
    pub waist: Decimal,
    /// Hips
    pub hips: Decimal,
    /// Shoulder
    pub shoulder: Decimal,
    /// Sleeve length
    pub sleeve_length: Decimal,
    /// Full length
    pub full_length: Decimal,
    /// Notes about the measurements
    pub additional_notes: String,
}

impl From<MeasurementValues> for MeasurementDetails {
    fn from(values: MeasurementValues) -> Self {
        Self {
            chest: Some(values.chest.into()),
            waist: Some(values.waist.into()),
            hips: Some(values.hips.into()),
            shoulder: Some(values.shoulder.into()),
            sleeve_length: Some(values.sleeve_length.into()),
            full_length: Some(values.full_length.into()),
            additional_notes: values.additional_notes,
        }
    }
}

impl MeasurementDetails {
    fn normalize(&mut self) {
        self.additional_notes = self.additional_notes.trim().to_string();
    }

    /// Checks every measurement and returns the values when all of them pass.
    ///
    /// # Errors
    /// Returns one error per missing, non-numeric or out-of-range measurement,
    /// keyed by field name.
    pub fn to_values(&self) -> Result<MeasurementValues, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let mut check = |field: &'static str, input: Option<&MeasurementInput>| {
            let checked = match input {
                None => Err(measurement_error("required", "This field is required.")),
                Some(MeasurementInput::Invalid(_)) => {
                    Err(measurement_error("measurement_number", "Enter a number."))
                }
                Some(MeasurementInput::Value(value)) => {
                    validate_measurement(value).map(|()| *value)
                }
            };
            checked.map_err(|error| errors.add(field, error)).ok()
        };

        let chest = check("chest", self.chest.as_ref());
        let waist = check("waist", self.waist.as_ref());
        let hips = check("hips", self.hips.as_ref());
        let shoulder = check("shoulder", self.shoulder.as_ref());
        let sleeve_length = check("sleeve_length", self.sleeve_length.as_ref());
        let full_length = check("full_length", self.full_length.as_ref());

        let (
            Some(chest),
            Some(waist),
            Some(hips),
            Some(shoulder),
            Some(sleeve_length),
            Some(full_length),
        ) = (chest, waist, hips, shoulder, sleeve_length, full_length)
        else {
            return Err(errors);
        };

        Ok(MeasurementValues {
            chest,
            waist,
            hips,
            shoulder,
            sleeve_length,
            full_length,
            additional_notes: self.additional_notes.clone(),
        })
    }
}

impl Validate for MeasurementDetails {
    fn validate(&self) -> Result<(), ValidationErrors> {
        self.to_values().map(|_| ())
    }
}

/// Form for a quote on a product already in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ExistingProductQuote {
    /// Who is asking
    #[validate(nested)]
    #[serde(default)]
    pub client: ClientDetails,
    /// Preferred fabric
    #[validate(length(min = 1, max = 200, message = "Enter a fabric preference (up to 200 characters)."))]
    #[serde(default)]
    pub fabric_preference: String,
    /// Special requirements
    #[serde(default)]
    pub additional_notes: String,
    /// Body measurements
    #[validate(nested)]
    #[serde(default)]
    pub measurements: MeasurementDetails,
}

impl ExistingProductQuote {
    /// Trims text fields and drops blank optional values.
    pub fn normalize(&mut self) {
        self.client.normalize();
        self.measurements.normalize();
        self.fabric_preference = self.fabric_preference.trim().to_string();
        self.additional_notes = self.additional_notes.trim().to_string();
    }
}

/// Form for a quote on a project described by the client.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CustomProjectQuote {
    /// Who is asking
    #[validate(nested)]
    #[serde(default)]
    pub client: ClientDetails,
    /// What should be made
    #[validate(length(min = 1, message = "Describe your custom project."))]
    #[serde(default)]
    pub custom_description: String,
    /// Preferred fabric
    #[validate(length(min = 1, max = 200, message = "Enter a fabric preference (up to 200 characters)."))]
    #[serde(default)]
    pub fabric_preference: String,
    /// Reference to an uploaded inspiration image
    #[serde(default)]
    pub reference_image: Option<String>,
    /// Special requirements
    #[serde(default)]
    pub additional_notes: String,
    /// Body measurements
    #[validate(nested)]
    #[serde(default)]
    pub measurements: MeasurementDetails,
}

impl CustomProjectQuote {
    /// Trims text fields and drops blank optional values.
    pub fn normalize(&mut self) {
        self.client.normalize();
        self.measurements.normalize();
        self.custom_description = self.custom_description.trim().to_string();
        self.fabric_preference = self.fabric_preference.trim().to_string();
        self.reference_image = non_blank(self.reference_image.take());
        self.additional_notes = self.additional_notes.trim().to_string();
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn measurement_error(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

/// Checks a measurement fits a five-digit, one-decimal-place positive value.
///
/// # Errors
/// Returns a `ValidationError` describing the first rule the value breaks.
pub fn validate_measurement(value: &Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() || value.is_zero() {
        return Err(measurement_error(
            "measurement_positive",
            "Ensure this value is greater than zero.",
        ));
    }
    if value.normalize().scale() > 1 {
        return Err(measurement_error(
            "measurement_decimal_places",
            "Ensure that there are no more than 1 decimal place.",
        ));
    }
    if *value >= MAX_MEASUREMENT {
        return Err(measurement_error(
            "measurement_max_digits",
            "Ensure that there are no more than 5 digits in total.",
        ));
    }
    Ok(())
}

/// Flattens nested validation errors into `field.path -> messages`.
///
/// Errors without a message fall back to their code.
#[must_use]
pub fn field_errors(errors: &ValidationErrors) -> BTreeMap<String, Vec<String>> {
    let mut fields = BTreeMap::new();
    collect_field_errors(errors, "", &mut fields);
    fields
}

fn collect_field_errors(
    errors: &ValidationErrors,
    prefix: &str,
    fields: &mut BTreeMap<String, Vec<String>>,
) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{prefix}.{field}")
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                fields.entry(path).or_default().extend(
                    field_errors.iter().map(|error| {
                        error
                            .message
                            .as_ref()
                            .map_or_else(|| error.code.to_string(), ToString::to_string)
                    }),
                );
            }
            ValidationErrorsKind::Struct(inner) => collect_field_errors(inner, &path, fields),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    collect_field_errors(inner, &format!("{path}[{index}]"), fields);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{sample_client_details, sample_measurements};

    fn existing_form() -> ExistingProductQuote {
        ExistingProductQuote {
            client: sample_client_details("John Kamau", "0712345678"),
            fabric_preference: "Wool blend".to_string(),
            additional_notes: String::new(),
            measurements: sample_measurements(),
        }
    }

    #[test]
    fn test_valid_existing_form_passes() {
        let mut form = existing_form();
        form.normalize();
        assert!(form.validate().is_ok());
    }

    #[test]
    fn test_blank_fields_are_reported_per_field() {
        let mut form = existing_form();
        form.client.full_name = "   ".to_string();
        form.fabric_preference = String::new();
        form.normalize();

        let errors = form.validate().unwrap_err();
        let fields = field_errors(&errors);

        assert!(fields.contains_key("client.full_name"));
        assert!(fields.contains_key("fabric_preference"));
        assert!(!fields.contains_key("client.phone_number"));
    }

    #[test]
    fn test_phone_number_length_limit() {
        let mut form = existing_form();
        form.client.phone_number = "0123456789012345".to_string();
        let errors = form.validate().unwrap_err();
        assert!(field_errors(&errors).contains_key("client.phone_number"));
    }

    #[test]
    fn test_blank_email_becomes_none_and_bad_email_fails() {
        let mut form = existing_form();
        form.client.email = Some("  ".to_string());
        form.normalize();
        assert!(form.client.email.is_none());
        assert!(form.validate().is_ok());

        form.client.email = Some("not-an-email".to_string());
        let errors = form.validate().unwrap_err();
        assert_eq!(
            field_errors(&errors).get("client.email"),
            Some(&vec!["Enter a valid email address.".to_string()])
        );
    }

    #[test]
    fn test_custom_form_requires_description() {
        let mut form = CustomProjectQuote {
            client: sample_client_details("Mary Wanjiku", "0723456789"),
            custom_description: "  ".to_string(),
            fabric_preference: "Ankara print".to_string(),
            reference_image: Some(String::new()),
            additional_notes: String::new(),
            measurements: sample_measurements(),
        };
        form.normalize();

        assert!(form.reference_image.is_none());
        let errors = form.validate().unwrap_err();
        assert!(field_errors(&errors).contains_key("custom_description"));
    }

    #[test]
    fn test_measurement_rules() {
        assert!(validate_measurement(&Decimal::new(385, 1)).is_ok());
        assert!(validate_measurement(&Decimal::new(4200, 2)).is_ok()); // 42.00 is 42.0
        assert!(validate_measurement(&Decimal::new(99_999, 1)).is_ok());

        let too_precise = validate_measurement(&Decimal::new(3855, 2)).unwrap_err();
        assert_eq!(too_precise.code, "measurement_decimal_places");

        let too_large = validate_measurement(&Decimal::new(10_000, 0)).unwrap_err();
        assert_eq!(too_large.code, "measurement_max_digits");

        let negative = validate_measurement(&Decimal::new(-10, 0)).unwrap_err();
        assert_eq!(negative.code, "measurement_positive");
        assert!(validate_measurement(&Decimal::ZERO).is_err());
    }

    #[test]
    fn test_bad_measurement_is_reported_under_measurements() {
        let mut form = existing_form();
        form.measurements.waist = Some(Decimal::new(3615, 2).into());
        let errors = form.validate().unwrap_err();
        let fields = field_errors(&errors);
        assert_eq!(
            fields.get("measurements.waist"),
            Some(&vec![
                "Ensure that there are no more than 1 decimal place.".to_string()
            ])
        );
    }

    #[test]
    fn test_measurements_deserialize_from_json_numbers() {
        let json = r#"{"chest": 42.0, "waist": 36, "hips": "40.5", "shoulder": 18.0,
                       "sleeve_length": 25.0, "full_length": 30.0}"#;
        let details: MeasurementDetails = serde_json::from_str(json).unwrap();
        let values = details.to_values().unwrap();
        assert_eq!(values.waist, Decimal::new(36, 0));
        assert_eq!(values.hips, Decimal::new(405, 1));
        assert!(values.additional_notes.is_empty());
    }

    #[test]
    fn test_missing_and_non_numeric_measurements_are_reported_per_field() {
        let json = r#"{"chest": "abc", "waist": 36, "hips": null, "shoulder": true,
                       "sleeve_length": 25.0}"#;
        let details: MeasurementDetails = serde_json::from_str(json).unwrap();
        assert_eq!(
            details.chest,
            Some(MeasurementInput::Invalid(serde_json::json!("abc")))
        );

        let fields = field_errors(&details.validate().unwrap_err());
        assert_eq!(
            fields.get("chest"),
            Some(&vec!["Enter a number.".to_string()])
        );
        assert_eq!(
            fields.get("hips"),
            Some(&vec!["This field is required.".to_string()])
        );
        assert!(fields.contains_key("shoulder"));
        assert!(fields.contains_key("full_length"));
        assert!(!fields.contains_key("waist"));
        assert!(!fields.contains_key("sleeve_length"));
    }

    #[test]
    fn test_missing_keys_become_field_errors() {
        let json = r#"{"client": {"phone_number": "0712345678"}, "fabric_preference": "Silk"}"#;
        let form: CustomProjectQuote = serde_json::from_str(json).unwrap();

        let fields = field_errors(&form.validate().unwrap_err());
        assert!(fields.contains_key("client.full_name"));
        assert!(fields.contains_key("custom_description"));
        assert!(fields.contains_key("measurements.chest"));
        assert!(!fields.contains_key("client.phone_number"));
        assert!(!fields.contains_key("fabric_preference"));
    }
}
