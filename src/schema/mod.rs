//! Schema Registry
//!
//! A fixed set of collections, each with a static field table. Collections
//! are an enum rather than runtime-discovered names, so a resolved
//! [`Collection`] is always a valid registry key.
//!
//! Resolution has two entry points:
//! - [`Collection::resolve`] - exact (case-insensitive) name lookup
//! - [`Collection::fuzzy_resolve`] - forgiving lookup for model guesses such
//!   as `"Contact"` or `"email logs"`, falling back to a default collection

mod collections;
pub mod validation;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

pub use validation::{validate_full, validate_partial};

/// Primitive type of a schema field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    String,
    Bool,
    Int,
    Float,
    /// Nested mapping
    Object,
    /// Sequence of any values
    List,
    Any,
}

impl FieldType {
    pub fn name(&self) -> &'static str {
        match self {
            FieldType::String => "string",
            FieldType::Bool => "bool",
            FieldType::Int => "int",
            FieldType::Float => "float",
            FieldType::Object => "object",
            FieldType::List => "list",
            FieldType::Any => "any",
        }
    }
}

impl fmt::Display for FieldType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// One field of a record shape
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub field_type: FieldType,
    pub required: bool,
}

impl FieldSpec {
    pub const fn required(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, field_type: FieldType) -> Self {
        Self {
            name,
            field_type,
            required: false,
        }
    }
}

/// Record shape of one collection
#[derive(Debug, Clone, Copy)]
pub struct SchemaDescriptor {
    pub collection: Collection,
    pub fields: &'static [FieldSpec],
}

impl SchemaDescriptor {
    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.required)
    }
}

/// Registered collections, in registry iteration order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Collection {
    Categories,
    Contacts,
    Settings,
    Companies,
    Tasks,
    Permissions,
    ChatLists,
    Logs,
    EmailLogs,
    HelpCenter,
    Friends,
    StaticPages,
    Notifications,
    ManualLogs,
    Roles,
    Users,
    Chats,
    Jobs,
    EmailTemplates,
    Admins,
}

impl Collection {
    /// Every collection in registry iteration order
    pub const ALL: [Collection; 20] = [
        Collection::Categories,
        Collection::Contacts,
        Collection::Settings,
        Collection::Companies,
        Collection::Tasks,
        Collection::Permissions,
        Collection::ChatLists,
        Collection::Logs,
        Collection::EmailLogs,
        Collection::HelpCenter,
        Collection::Friends,
        Collection::StaticPages,
        Collection::Notifications,
        Collection::ManualLogs,
        Collection::Roles,
        Collection::Users,
        Collection::Chats,
        Collection::Jobs,
        Collection::EmailTemplates,
        Collection::Admins,
    ];

    /// Registry key (lowercase collection name)
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Categories => "categories",
            Collection::Contacts => "contacts",
            Collection::Settings => "settings",
            Collection::Companies => "companies",
            Collection::Tasks => "tasks",
            Collection::Permissions => "permissions",
            Collection::ChatLists => "chat_lists",
            Collection::Logs => "logs",
            Collection::EmailLogs => "emaillogs",
            Collection::HelpCenter => "helpcenter",
            Collection::Friends => "friends",
            Collection::StaticPages => "staticpages",
            Collection::Notifications => "notifications",
            Collection::ManualLogs => "manuallogs",
            Collection::Roles => "roles",
            Collection::Users => "users",
            Collection::Chats => "chats",
            Collection::Jobs => "jobs",
            Collection::EmailTemplates => "emailtemplates",
            Collection::Admins => "admins",
        }
    }

    /// Singular form of the registry key (`users` -> `user`)
    pub fn singular(&self) -> &'static str {
        match self {
            Collection::Categories => "category",
            Collection::Companies => "company",
            Collection::HelpCenter => "helpcenter",
            _ => {
                let name = self.name();
                name.strip_suffix('s').unwrap_or(name)
            }
        }
    }

    pub fn descriptor(&self) -> SchemaDescriptor {
        let fields = match self {
            Collection::Categories => collections::CATEGORIES,
            Collection::Contacts => collections::CONTACTS,
            Collection::Settings => collections::SETTINGS,
            Collection::Companies => collections::COMPANIES,
            Collection::Tasks => collections::TASKS,
            Collection::Permissions => collections::PERMISSIONS,
            Collection::ChatLists => collections::CHAT_LISTS,
            Collection::Logs | Collection::ManualLogs => collections::LOGS,
            Collection::EmailLogs => collections::EMAIL_LOGS,
            Collection::HelpCenter => collections::HELP_CENTER,
            Collection::Friends => collections::FRIENDS,
            Collection::StaticPages => collections::STATIC_PAGES,
            Collection::Notifications => collections::NOTIFICATIONS,
            Collection::Roles => collections::ROLES,
            Collection::Users => collections::USERS,
            Collection::Chats => collections::CHATS,
            Collection::Jobs => collections::JOBS,
            Collection::EmailTemplates => collections::EMAIL_TEMPLATES,
            Collection::Admins => collections::ADMINS,
        };
        SchemaDescriptor {
            collection: *self,
            fields,
        }
    }

    /// Exact, case-insensitive lookup
    pub fn resolve(name: &str) -> Option<Collection> {
        let wanted = name.trim().to_lowercase();
        Self::ALL.into_iter().find(|c| c.name() == wanted)
    }

    /// Forgiving lookup for imperfect names; never fails
    ///
    /// Tried in order, each pass in registry order:
    /// 1. normalised equality with the key or its singular form
    /// 2. key contained in the candidate
    /// 3. singular form contained in the candidate
    /// 4. `default`
    pub fn fuzzy_resolve(candidate: &str, default: Collection) -> Collection {
        let normalised = normalise(candidate);
        if normalised.is_empty() {
            return default;
        }
        let passes: [&dyn Fn(&Collection) -> bool; 3] = [
            &|c| normalised == normalise(c.name()) || normalised == normalise(c.singular()),
            &|c| normalised.contains(&normalise(c.name())),
            &|c| normalised.contains(normalise(c.singular()).as_str()),
        ];

        passes
            .iter()
            .find_map(|pass| Self::ALL.into_iter().find(|c| pass(c)))
            .unwrap_or(default)
    }
}

/// Lowercase with separators removed (`"Email Logs"` -> `"emaillogs"`)
fn normalise(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Error for names outside the registry
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown collection '{0}'")]
pub struct UnknownCollection(pub String);

impl FromStr for Collection {
    type Err = UnknownCollection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::resolve(s).ok_or_else(|| UnknownCollection(s.to_string()))
    }
}

impl Serialize for Collection {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Collection {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_exact() {
        assert_eq!(Collection::resolve("users"), Some(Collection::Users));
        assert_eq!(Collection::resolve(" Chat_Lists "), Some(Collection::ChatLists));
        assert_eq!(Collection::resolve("user"), None);
    }

    #[test]
    fn test_fuzzy_resolve_singular_guess() {
        assert_eq!(
            Collection::fuzzy_resolve("Contact", Collection::Users),
            Collection::Contacts
        );
        assert_eq!(
            Collection::fuzzy_resolve("email logs", Collection::Users),
            Collection::EmailLogs
        );
        assert_eq!(
            Collection::fuzzy_resolve("emaillog", Collection::Users),
            Collection::EmailLogs
        );
        assert_eq!(
            Collection::fuzzy_resolve("chat", Collection::Users),
            Collection::Chats
        );
    }

    #[test]
    fn test_fuzzy_resolve_substring_and_default() {
        assert_eq!(
            Collection::fuzzy_resolve("my_jobs_table", Collection::Users),
            Collection::Jobs
        );
        assert_eq!(
            Collection::fuzzy_resolve("widgets", Collection::Users),
            Collection::Users
        );
        assert_eq!(
            Collection::fuzzy_resolve("", Collection::Contacts),
            Collection::Contacts
        );
    }

    #[test]
    fn test_registry_names_are_unique_lowercase() {
        let mut names: Vec<&str> = Collection::ALL.iter().map(|c| c.name()).collect();
        assert!(names.iter().all(|n| n.to_lowercase() == *n));
        names.sort();
        names.dedup();
        assert_eq!(names.len(), Collection::ALL.len());
    }

    #[test]
    fn test_users_requires_name_and_email() {
        let required: Vec<&str> = Collection::Users
            .descriptor()
            .required_fields()
            .map(|f| f.name)
            .collect();
        assert_eq!(required, vec!["name", "email"]);
    }

    #[test]
    fn test_serde_uses_registry_key() {
        let json = serde_json::to_string(&Collection::ChatLists).unwrap();
        assert_eq!(json, "\"chat_lists\"");
        let parsed: Collection = serde_json::from_str("\"contacts\"").unwrap();
        assert_eq!(parsed, Collection::Contacts);
        assert!(serde_json::from_str::<Collection>("\"widgets\"").is_err());
    }
}
