//! Canonical field schemas.

/// One output field: where to find it in the record and how to label it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub path: &'static str,
    pub label: &'static str,
}

const fn field(path: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec { path, label }
}

/// Full LORA report schema, shared by the field tables of every format and
/// the header row of the list workbook.
pub const REPORT_FIELDS: &[FieldSpec] = &[
    field("id", "Report ID"),
    field("userId", "User ID"),
    field("user.documentId", "User document"),
    field("user.userInformation.name", "User first name"),
    field("user.userInformation.lastName", "User last name"),
    field("externalNameUser", "External user name"),
    field("externalOrganization", "External organization"),
    field("reportTitle", "Report title"),
    field("conversation", "Conversation"),
    field("base", "Base"),
    field("createdAt", "Created at"),
    field("updatedAt", "Updated at"),
    field("unity", "Unit"),
    field("rig", "Rig"),
    field("project", "Project"),
    field("field", "Field"),
    field("reportType", "Report type"),
    field("hazardClassification", "Hazard classification"),
    field("hazardType", "Hazard type"),
    field("detailedDescription", "Detailed description"),
    field("findingCause", "Finding cause"),
    field("reportEvidence", "Report evidence"),
    field("actions", "Actions"),
    field("reportStatus", "Report status"),
    field("loraReportCode", "LORA report code"),
];

/// Compact grid shown in the summary block of the styled PDF.
pub const STYLED_SUMMARY_FIELDS: &[FieldSpec] = &[
    field("project", "Project"),
    field("unity", "Unit"),
    field("rig", "Rig"),
    field("base", "Base"),
    field("field", "Field"),
    field("hazardClassification", "Classification"),
    field("reportType", "Report type"),
    field("hazardType", "Type"),
    field("createdBy", "Created by"),
    field("updatedAt", "Updated"),
];
