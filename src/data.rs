use serde::{Deserialize, Serialize};

pub const GENDERS: [&str; 3] = ["Male", "Female", "Other"];

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: String,
    pub ap_id: String,
    pub name: String,
    pub surname: String,
    pub gender: String,
}

impl Client {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.name, self.surname)
    }

    /// Case-insensitive substring match over name, surname and customer id.
    /// `query` is expected to be lower-cased already.
    pub fn matches(&self, query: &str) -> bool {
        self.name.to_lowercase().contains(query)
            || self.surname.to_lowercase().contains(query)
            || self.ap_id.to_lowercase().contains(query)
    }
}

/// Editable fields of a client, staged while the add/edit dialog is open.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ClientForm {
    pub ap_id: String,
    pub name: String,
    pub surname: String,
    pub gender: String,
}

impl ClientForm {
    pub fn from_client(client: &Client) -> Self {
        Self {
            ap_id: client.ap_id.clone(),
            name: client.name.clone(),
            surname: client.surname.clone(),
            gender: client.gender.clone(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::ApId => &self.ap_id,
            FormField::Name => &self.name,
            FormField::Surname => &self.surname,
            FormField::Gender => &self.gender,
        }
    }

    pub fn set(&mut self, field: FormField, value: String) {
        match field {
            FormField::ApId => self.ap_id = value,
            FormField::Name => self.name = value,
            FormField::Surname => self.surname = value,
            FormField::Gender => self.gender = value,
        }
    }

    pub fn is_complete(&self) -> bool {
        FormField::ALL
            .iter()
            .all(|field| !self.get(*field).is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FormField {
    ApId,
    Name,
    Surname,
    Gender,
}

impl FormField {
    pub const ALL: [FormField; 4] = [
        FormField::ApId,
        FormField::Name,
        FormField::Surname,
        FormField::Gender,
    ];

    /// Input name as used on the wire and in the form markup.
    pub fn name(&self) -> &'static str {
        match self {
            FormField::ApId => "apId",
            FormField::Name => "name",
            FormField::Surname => "surname",
            FormField::Gender => "gender",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FormField::ApId => "Customer ID",
            FormField::Name => "Name",
            FormField::Surname => "Surname",
            FormField::Gender => "Gender",
        }
    }
}

pub fn gender_label(gender: &str) -> String {
    let mut chars = gender.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
pub(crate) fn sample_client(id: &str, ap_id: &str, name: &str, surname: &str) -> Client {
    Client {
        id: id.to_string(),
        ap_id: ap_id.to_string(),
        name: name.to_string(),
        surname: surname.to_string(),
        gender: "Other".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_uses_camel_case_on_the_wire() {
        let json = r#"{"id":"1","apId":"C1","name":"Ann","surname":"Lee","gender":"Female"}"#;
        let client: Client = serde_json::from_str(json).unwrap();
        assert_eq!(client.ap_id, "C1");
        assert_eq!(client.full_name(), "Ann Lee");

        let form = ClientForm::from_client(&client);
        let body = serde_json::to_value(&form).unwrap();
        assert_eq!(body["apId"], "C1");
        assert!(body.get("id").is_none());
    }

    #[test]
    fn test_matches_searched_fields_only() {
        let client = Client {
            id: "xyz".to_string(),
            ap_id: "AP-77".to_string(),
            name: "Ann".to_string(),
            surname: "Lee".to_string(),
            gender: "Female".to_string(),
        };
        assert!(client.matches("ann"));
        assert!(client.matches("lee"));
        assert!(client.matches("ap-7"));
        assert!(client.matches(""));
        assert!(!client.matches("xyz"));
        assert!(!client.matches("female"));
    }

    #[test]
    fn test_form_completeness() {
        let mut form = ClientForm::default();
        assert!(!form.is_complete());

        form.set(FormField::ApId, "C1".to_string());
        form.set(FormField::Name, "Ann".to_string());
        form.set(FormField::Surname, "Lee".to_string());
        assert!(!form.is_complete());

        form.set(FormField::Gender, "Female".to_string());
        assert!(form.is_complete());

        // whitespace counts as a value
        form.set(FormField::Name, " ".to_string());
        assert!(form.is_complete());
    }

    #[test]
    fn test_field_names_match_wire_names() {
        let form = ClientForm {
            ap_id: "C1".to_string(),
            name: "Ann".to_string(),
            surname: "Lee".to_string(),
            gender: "Female".to_string(),
        };
        let body = serde_json::to_value(&form).unwrap();
        for field in FormField::ALL {
            assert_eq!(body[field.name()], form.get(field));
        }
    }

    #[test]
    fn test_gender_label() {
        assert_eq!(gender_label("male"), "Male");
        assert_eq!(gender_label("Other"), "Other");
        assert_eq!(gender_label(""), "");
    }
}
