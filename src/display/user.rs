//! User display formatting

use super::format_timestamp;
use crate::models::User;

/// Format users as a table
pub fn format_user_list(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }

    let name_width = users
        .iter()
        .map(|u| u.display_name().chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    let email_width = users
        .iter()
        .map(|u| u.email().chars().count())
        .max()
        .unwrap_or(5)
        .max(5);

    let mut output = String::new();
    output.push_str(&format!(
        "{:<12}  {:<name_width$}  {:<email_width$}  {:<12}  {}\n",
        "ID",
        "Name",
        "Email",
        "Status",
        "Signature",
        name_width = name_width,
        email_width = email_width,
    ));
    output.push_str(&format!(
        "{:-<12}  {:-<name_width$}  {:-<email_width$}  {:-<12}  {:-<12}\n",
        "",
        "",
        "",
        "",
        "",
        name_width = name_width,
        email_width = email_width,
    ));

    for user in users {
        output.push_str(&format!(
            "{:<12}  {:<name_width$}  {:<email_width$}  {:<12}  {}\n",
            user.id.short(),
            user.display_name(),
            user.email(),
            user.meta().status().to_string(),
            user.meta().signature().short(),
            name_width = name_width,
            email_width = email_width,
        ));
    }

    output
}

/// Format a single user's details. The password hash is never shown.
pub fn format_user_details(user: &User) -> String {
    let meta = user.meta();
    let mut output = String::new();

    output.push_str(&format!("User: {}\n", user.display_name()));
    output.push_str(&format!("  ID:           {}\n", user.id));
    output.push_str(&format!("  Org:          {}\n", user.org));
    output.push_str(&format!("  Email:        {}\n", user.email()));
    output.push_str(&format!("  Public Key:   {}\n", user.public_key()));
    output.push_str(&format!("  Status:       {}\n", meta.status()));
    output.push_str(&format!("  Role:         {}\n", meta.role()));
    output.push_str(&format!("  Key Version:  {}\n", user.key_version()));
    output.push_str(&format!("  Signature:    {}\n", meta.signature()));
    output.push_str(&format!("  Created:      {}\n", format_timestamp(meta.ctime())));
    output.push_str(&format!("  Modified:     {}\n", format_timestamp(meta.mtime())));

    output
}
