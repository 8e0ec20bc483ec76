//! Org display formatting
//!
//! Formats orgs for terminal output in table and detail views.

use super::format_timestamp;
use crate::models::{Org, User};

/// Format a list of orgs as a table
pub fn format_org_list(orgs: &[Org]) -> String {
    if orgs.is_empty() {
        return "No orgs found.".to_string();
    }

    let name_width = orgs
        .iter()
        .map(|o| o.name.len())
        .max()
        .unwrap_or(4)
        .max(4);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<name_width$}  {:<12}  {:<12}  {:<12}  {}\n",
        "Name",
        "ID",
        "Owner",
        "Status",
        "Signature",
        name_width = name_width,
    ));
    output.push_str(&format!(
        "{:-<name_width$}  {:-<12}  {:-<12}  {:-<12}  {:-<12}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
    ));

    for org in orgs {
        output.push_str(&format!(
            "{:<name_width$}  {:<12}  {:<12}  {:<12}  {}\n",
            org.name,
            org.id.short(),
            org.owner.short(),
            org.meta().status().to_string(),
            org.meta().signature().short(),
            name_width = name_width,
        ));
    }

    output
}

/// Format a single org with its members
pub fn format_org_details(org: &Org, members: &[User]) -> String {
    let meta = org.meta();
    let mut output = String::new();

    output.push_str(&format!("Org: {}\n", org.name));
    output.push_str(&format!("  ID:         {}\n", org.id));
    output.push_str(&format!("  Owner:      {}\n", org.owner));
    output.push_str(&format!("  Status:     {}\n", meta.status()));
    output.push_str(&format!("  Role:       {}\n", meta.role()));
    output.push_str(&format!("  Signature:  {}\n", meta.signature()));
    output.push_str(&format!("  Created:    {}\n", format_timestamp(meta.ctime())));
    output.push_str(&format!("  Modified:   {}\n", format_timestamp(meta.mtime())));

    output.push_str(&format!("\nMembers ({}):\n", members.len()));
    if members.is_empty() {
        output.push_str("  (none)\n");
    }
    for user in members {
        let marker = if user.id == org.owner { " (owner)" } else { "" };
        output.push_str(&format!(
            "  {}  {}  {}{}\n",
            user.id.short(),
            user.display_name(),
            user.meta().status(),
            marker
        ));
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_list() {
        assert_eq!(format_org_list(&[]), "No orgs found.");
    }
}
