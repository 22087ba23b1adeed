use clap::Args;
use serde_json::{json, Value};

use item_input::input::{
    boolean_def, choose_def, list_selection_def, object_def, optional_def, optional_string_def,
    static_def, string_def, undefined_def, Choice, Context, EmptyChoices, InputDefinition,
};
use item_input::text;
use item_input::validation::{email_validate, https_url_validate, Validation};

use super::{read_prior, run_form, CmdResult, FormOutput, GlobalArgs};

const AWS_HELP: &str = "Lambda ARNs are listed in the AWS console under Lambda > Functions. \
                        Enter the ARN for each region the connector runs in.";

#[derive(Args)]
pub struct SchemaAppArgs {
    /// Print the result without creating anything
    #[arg(long)]
    pub dry_run: bool,

    /// Build the form for the China region (lambda only, CN ARN)
    #[arg(long)]
    pub china: bool,

    /// Organization to offer, as ID=NAME (repeatable)
    #[arg(long = "organization", value_name = "ID=NAME")]
    pub organizations: Vec<String>,

    /// Edit an existing app: inline JSON or @file
    #[arg(long, value_name = "JSON")]
    pub from: Option<String>,
}

pub fn run(args: SchemaAppArgs, global: &GlobalArgs) -> CmdResult<FormOutput> {
    let prior = args.from.as_deref().map(read_prior).transpose()?;
    let organizations = parse_organizations(&args.organizations)?;
    let def = build_definition(args.china, organizations, prior.as_ref())?;

    let prior = prior.map(|mut app| {
        let has_links = app.get("viperAppLinks").is_some();
        app["includeAppLinks"] = Value::Bool(has_links);
        app
    });
    let (mut output, code) = run_form("schema-app", &def, prior, args.dry_run, global)?;
    if let Some(Value::Object(app)) = output.value.as_mut() {
        app.remove("includeAppLinks");
    }
    Ok((output, code))
}

fn parse_organizations(raw: &[String]) -> item_input::Result<Vec<Choice<Value>>> {
    raw.iter()
        .map(|entry| match entry.split_once('=') {
            Some((id, name)) if !id.is_empty() && !name.is_empty() => {
                Ok(Choice::new(name, json!(id)))
            }
            _ => Err(item_input::Error::validation_invalid_argument(
                "organization",
                format!("Expected ID=NAME, got '{}'", entry),
                None,
                None,
            )),
        })
        .collect()
}

fn hosting_type_is(expected: &'static str) -> impl Fn(&Context) -> bool + Send + Sync + 'static {
    move |ctx| ctx.field_str("hostingType") == Some(expected)
}

fn arn_def(
    name: &str,
    in_china: bool,
    for_china: bool,
    prior: Option<&Value>,
) -> InputDefinition {
    if in_china != for_china {
        return undefined_def();
    }
    let inner = if in_china {
        string_def(name).help_text(AWS_HELP)
    } else {
        optional_string_def(name).help_text(AWS_HELP)
    };
    let initially_active = prior.and_then(|p| p.get("hostingType")) == Some(&json!("lambda"));
    optional_def(inner, hosting_type_is("lambda"))
        .initially_active(initially_active)
        .into()
}

fn webhook_url_def(in_china: bool, prior: Option<&Value>) -> InputDefinition {
    if in_china {
        return undefined_def();
    }
    let initially_active = prior.and_then(|p| p.get("hostingType")) == Some(&json!("webhook"));
    optional_def(
        string_def("Webhook URL").validate(https_url_validate),
        hosting_type_is("webhook"),
    )
    .initially_active(initially_active)
    .into()
}

fn lambda_arn_required(app: &serde_json::Map<String, Value>, _ctx: &Context) -> Validation {
    let any_arn = ["lambdaArn", "lambdaArnEU", "lambdaArnAP", "lambdaArnCN"]
        .iter()
        .any(|key| app.get(*key).and_then(Value::as_str).is_some_and(|s| !s.is_empty()));
    if app.get("hostingType") == Some(&json!("lambda")) && !any_arn {
        Validation::invalid("At least one lambda ARN is required.")
    } else {
        Validation::Valid
    }
}

pub(crate) fn build_definition(
    in_china: bool,
    organizations: Vec<Choice<Value>>,
    prior: Option<&Value>,
) -> item_input::Result<InputDefinition> {
    let hosting_type = if in_china {
        static_def("lambda")
    } else {
        list_selection_def("Hosting Type", ["lambda", "webhook"])
            .default_value("webhook")
            .into()
    };

    let app_links = object_def("App-to-app Links")
        .field("android", string_def("Android Link"))
        .field("ios", string_def("iOS Link"))
        .field("isLinkingEnabled", static_def(true))
        .summarize_with(|value, _| {
            text::clip_to_maximum(
                &format!(
                    "android: {}, ios: {}",
                    text::string_from_value(value.get("android").unwrap_or(&Value::Null)),
                    text::string_from_value(value.get("ios").unwrap_or(&Value::Null)),
                ),
                60,
            )
        });
    let has_links = prior.and_then(|p| p.get("viperAppLinks")).is_some();

    Ok(object_def("Schema App")
        .field(
            "organizationId",
            choose_def("Organization", organizations, EmptyChoices::Absent)?,
        )
        .field("partnerName", string_def("Partner Name"))
        .field("userEmail", string_def("User email").validate(email_validate))
        .field(
            "appName",
            optional_string_def("App Name").default_with(|ctx| {
                ctx.field_str("partnerName").unwrap_or_default().to_string()
            }),
        )
        .field(
            "oAuthAuthorizationUrl",
            string_def("OAuth Authorization URL").validate(https_url_validate),
        )
        .field(
            "oAuthTokenUrl",
            string_def("Partner OAuth Refresh Token URL").validate(https_url_validate),
        )
        .field("icon", optional_string_def("Icon URL").validate(https_url_validate))
        .field("icon2x", optional_string_def("2x Icon URL").validate(https_url_validate))
        .field("icon3x", optional_string_def("3x Icon URL").validate(https_url_validate))
        .field("oAuthClientId", string_def("Partner OAuth Client Id"))
        .field("oAuthClientSecret", string_def("Partner OAuth Client Secret"))
        .field("oAuthScope", optional_string_def("Partner OAuth Scope"))
        .field("schemaType", static_def("st-schema"))
        .field("hostingType", hosting_type)
        .field("lambdaArn", arn_def("Lambda ARN for US region", in_china, false, prior))
        .field("lambdaArnEU", arn_def("Lambda ARN for EU region", in_china, false, prior))
        .field("lambdaArnCN", arn_def("Lambda ARN for CN region", in_china, true, prior))
        .field("lambdaArnAP", arn_def("Lambda ARN for AP region", in_china, false, prior))
        .field("webhookUrl", webhook_url_def(in_china, prior))
        .field(
            "includeAppLinks",
            boolean_def("Enable app-to-app linking?").default_value(false),
        )
        .field(
            "viperAppLinks",
            optional_def(app_links, |ctx| {
                ctx.field("includeAppLinks").and_then(Value::as_bool) == Some(true)
            })
            .initially_active(has_links),
        )
        .validate_final(lambda_arn_required)
        .into())
}
