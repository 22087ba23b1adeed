use clap::Args;
use serde_json::{json, Value};
use uuid::Uuid;

use item_input::input::{
    checkbox_def, computed_def, list_def, object_def, optional_string_def, static_def,
    string_def, InputDefinition,
};
use item_input::validation::{
    at_least_one, https_url_validate, localhost_or_https_validate, string_validator, StringRules,
};

use super::{read_prior, run_form, CmdResult, FormOutput, GlobalArgs};

const HELP_TEXT: &str = "An OAuth-In app lets an external service act on a user's behalf. \
                         Choose the narrowest set of scopes the service needs.";

const SCOPES: &[&str] = &[
    "r:devices:*",
    "w:devices:*",
    "x:devices:*",
    "r:hubs:*",
    "r:locations:*",
    "w:locations:*",
    "x:locations:*",
    "r:scenes:*",
    "x:scenes:*",
    "r:rules:*",
    "w:rules:*",
    "r:installedapps",
    "w:installedapps",
];

const MAX_REDIRECT_URIS: usize = 10;

#[derive(Args)]
pub struct OauthAppArgs {
    /// Print the result without creating anything
    #[arg(long)]
    pub dry_run: bool,

    /// Edit an existing app: inline JSON or @file
    #[arg(long, value_name = "JSON")]
    pub from: Option<String>,
}

pub fn run(args: OauthAppArgs, global: &GlobalArgs) -> CmdResult<FormOutput> {
    let prior = args.from.as_deref().map(read_prior).transpose()?;
    let def = build_definition()?;
    run_form("oauth-app", &def, prior, args.dry_run, global)
}

/// Keep characters allowed in an app name.
fn sanitize(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect()
}

/// `{display-name}-{uuid}`, lowercased, always starting with a letter.
pub(crate) fn app_name(display_name: &str) -> String {
    let name = format!("{}-{}", sanitize(display_name), Uuid::new_v4()).to_lowercase();
    if name.starts_with(|c: char| c.is_ascii_lowercase()) {
        name
    } else {
        format!("a{}", name)
    }
}

fn length_limited(name: &str, max_length: usize) -> item_input::Result<InputDefinition> {
    let validate = string_validator(StringRules {
        max_length: Some(max_length),
        ..StringRules::default()
    })?;
    Ok(string_def(name).validate(validate).into())
}

pub(crate) fn build_definition() -> item_input::Result<InputDefinition> {
    let app_name_def = computed_def(|ctx| {
        let display_name = ctx.field_str("displayName").ok_or_else(|| {
            item_input::Error::definition_invalid("App Name", "displayName must be collected first")
        })?;
        Ok(Value::String(app_name(display_name)))
    });

    // Inside the nested "oauth" object the root app is one frame out.
    let client_name_def = computed_def(|ctx| {
        ctx.get(1)
            .and_then(|app| app.get("displayName"))
            .cloned()
            .ok_or_else(|| {
                item_input::Error::definition_invalid("Client Name", "displayName must be collected first")
            })
    });

    let scopes = checkbox_def("Scopes", SCOPES.iter().copied()).validate(at_least_one("scope"));
    let redirect_uris = list_def(
        "Redirect URIs",
        string_def("Redirect URI").validate(localhost_or_https_validate),
    )
    .min_items(0)
    .max_items(MAX_REDIRECT_URIS);

    Ok(object_def("OAuth-In SmartApp")
        .field("displayName", length_limited("Display Name", 75)?)
        .field("description", length_limited("Description", 250)?)
        .field("appName", app_name_def)
        .field("appType", static_def("API_ONLY"))
        .field("classifications", static_def(json!(["CONNECTED_SERVICE"])))
        .field("singleInstance", static_def(true))
        .field(
            "iconImage",
            object_def("Icon Image").field(
                "url",
                optional_string_def("Icon Image URL").validate(https_url_validate),
            ),
        )
        .field(
            "apiOnly",
            object_def("API Only").field(
                "targetUrl",
                optional_string_def("Target URL").validate(https_url_validate),
            ),
        )
        .field("principalType", static_def("LOCATION"))
        .field(
            "oauth",
            object_def("OAuth")
                .field("clientName", client_name_def)
                .field("scope", scopes)
                .field("redirectUris", redirect_uris),
        )
        .help_text(HELP_TEXT)
        .into())
}
