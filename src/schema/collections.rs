//! Static field tables for every registered collection

use super::{FieldSpec, FieldType};

use FieldType::{Any, Bool, Int, List, Object, String as Str};

const fn opt(name: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec::optional(name, field_type)
}

const fn req(name: &'static str, field_type: FieldType) -> FieldSpec {
    FieldSpec::required(name, field_type)
}

pub(super) const CATEGORIES: &[FieldSpec] = &[
    opt("name", Str),
    opt("id", Str),
    opt("isActive", Bool),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const CONTACTS: &[FieldSpec] = &[
    opt("email", Str),
    opt("user", Any),
    opt("company", Any),
    opt("name", Str),
    opt("mobile", Str),
    opt("message", Str),
    opt("file", Any),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const SETTINGS: &[FieldSpec] = &[
    opt("type", Str),
    opt("isSiteInMaintenance", Bool),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const COMPANIES: &[FieldSpec] = &[
    opt("email", Str),
    opt("user", Any),
    opt("name", Str),
    opt("address", Str),
    opt("ACN", Str),
    opt("ABN", Str),
    opt("image", Any),
    opt("category", Any),
    opt("isActive", Bool),
    opt("isDeleted", Bool),
    opt("deletedAt", Any),
    opt("deletedBy", Any),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const TASKS: &[FieldSpec] = &[
    opt("job", Any),
    opt("company", Any),
    opt("builder", Any),
    opt("contractor", Any),
    opt("disputant", Any),
    opt("category", Any),
    opt("status", Str),
    opt("requestedChange", Bool),
    opt("requestedRelease", Bool),
    opt("startDate", Any),
    opt("pdf", Str),
    opt("po", Str),
    opt("milestone", List),
    opt("timeline", List),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const PERMISSIONS: &[FieldSpec] = &[
    opt("name", Str),
    opt("method", Str),
    opt("displayName", Str),
    opt("module", Str),
    opt("type", Int),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const CHAT_LISTS: &[FieldSpec] = &[
    opt("name", Str),
    opt("builderCompany", Any),
    opt("contractorCompany", Any),
    opt("task", Any),
    opt("isActive", Bool),
    opt("muteBuilder", Bool),
    opt("muteContractor", Bool),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

/// Shared by `logs` and `manuallogs`
pub(super) const LOGS: &[FieldSpec] = &[
    opt("timestamp", Any),
    opt("level", Str),
    opt("message", Str),
    opt("meta", Object),
    opt("hostname", Str),
];

pub(super) const EMAIL_LOGS: &[FieldSpec] = &[
    opt("ref", Any),
    opt("slug", Str),
    opt("status", Str),
    opt("token", Any),
    opt("expiresIn", Any),
    opt("fulfilledAt", Any),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const HELP_CENTER: &[FieldSpec] = &[
    opt("title", Str),
    opt("question", Str),
    opt("answer", Str),
    opt("isActive", Bool),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const FRIENDS: &[FieldSpec] = &[
    opt("builder", Any),
    opt("contractor", Any),
    opt("company", Any),
    opt("category", Any),
    opt("sender", Any),
    opt("status", Str),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const STATIC_PAGES: &[FieldSpec] = &[
    opt("title", Str),
    opt("description", Str),
    opt("slug", Str),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const NOTIFICATIONS: &[FieldSpec] = &[
    opt("user", Any),
    opt("title", Str),
    opt("description", Str),
    opt("data", Object),
    opt("type", Str),
    opt("isSent", Bool),
    opt("isRead", Bool),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const ROLES: &[FieldSpec] = &[
    opt("name", Str),
    opt("permissions", List),
    opt("type", Int),
    opt("isActive", Bool),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const USERS: &[FieldSpec] = &[
    req("name", Str),
    req("email", Str),
    opt("userId", Str),
    opt("password", Str),
    opt("firstName", Str),
    opt("lastName", Str),
    opt("age", Int),
    opt("status", Str),
    opt("role", Any),
    opt("createdBy", Any),
    opt("avatar", Str),
    opt("mobile", Str),
    opt("countryDialCode", Str),
    opt("countryIsoCode", Str),
    opt("fcm", Any),
    opt("token", Any),
    opt("creditLimit", Any),
    opt("isSuspended", Bool),
    opt("isVerified", Bool),
    opt("isActive", Bool),
    opt("isDeleted", Bool),
    opt("deletedAt", Any),
    opt("deletedBy", Any),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const CHATS: &[FieldSpec] = &[
    opt("chatId", Any),
    opt("sender", Any),
    opt("receiver", Any),
    opt("message", Str),
    opt("isRead", Bool),
    opt("file", Any),
    opt("fileName", Any),
    opt("fileType", Any),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const JOBS: &[FieldSpec] = &[
    opt("jobId", Str),
    opt("lotSearch", Str),
    opt("projectAddress", Str),
    opt("stampedPlan", Str),
    opt("buildingContract", Str),
    opt("buildingPermit", Str),
    opt("builder", Any),
    opt("status", Str),
    opt("totalCost", Int),
    opt("commencementDate", Any),
    opt("completionDate", Any),
    opt("longitude", Any),
    opt("latitude", Any),
    opt("geometry", Object),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const EMAIL_TEMPLATES: &[FieldSpec] = &[
    opt("title", Str),
    opt("description", Str),
    opt("slug", Str),
    opt("values", List),
    opt("isActive", Bool),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];

pub(super) const ADMINS: &[FieldSpec] = &[
    opt("email", Str),
    opt("password", Str),
    opt("firstName", Str),
    opt("lastName", Str),
    opt("role", Any),
    opt("avatar", Str),
    opt("fcm", Any),
    opt("isActive", Bool),
    opt("isDeleted", Bool),
    opt("deletedAt", Any),
    opt("deletedBy", Any),
    opt("mobile", Str),
    opt("countryDialCode", Str),
    opt("countryIsoCode", Str),
    opt("createdAt", Any),
    opt("updatedAt", Any),
];
