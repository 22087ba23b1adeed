use serde_json::json;

use item_input::input::{
    checkbox_def, computed_def, evaluate, list_def, list_selection_def, object_def,
    optional_def, select_def, string_def, Choice, InputDefinition,
};
use item_input::prompt::{Answer, ScriptedPrompter};
use item_input::validation::{at_least_one, https_url_validate, localhost_or_https_validate};

fn hosted_app() -> InputDefinition {
    object_def("App")
        .field(
            "hostingType",
            list_selection_def("Hosting Type", ["lambda", "webhook"]).default_value("webhook"),
        )
        .field(
            "lambdaArn",
            optional_def(string_def("Lambda ARN"), |ctx| {
                ctx.field_str("hostingType") == Some("lambda")
            }),
        )
        .field(
            "webhookUrl",
            optional_def(
                string_def("Webhook URL").validate(https_url_validate),
                |ctx| ctx.field_str("hostingType") == Some("webhook"),
            ),
        )
        .into()
}

#[test]
fn webhook_hosting_asks_only_for_the_url() {
    let mut prompter = ScriptedPrompter::new([
        Answer::label("webhook"),
        Answer::text("http://insecure.example"),
        Answer::text("https://hook.example"),
    ]);

    let value = evaluate(&hosted_app(), &mut prompter, None).unwrap().value().unwrap();
    assert_eq!(
        value,
        json!({"hostingType": "webhook", "webhookUrl": "https://hook.example"})
    );
    assert_eq!(prompter.asked()[0].question, "Select Hosting Type.");
    assert_eq!(prompter.asked()[0].default.as_deref(), Some("webhook"));
    assert_eq!(prompter.messages(), ["https protocol is required"]);
}

#[test]
fn switching_hosting_type_swaps_dependent_fields() {
    let prior = json!({"hostingType": "webhook", "webhookUrl": "https://hook.example"});
    let mut prompter = ScriptedPrompter::new([
        Answer::label("Edit Hosting Type: webhook"),
        Answer::label("lambda"),
        Answer::text("arn:aws:lambda:1"),
        Answer::label("Finish editing App."),
    ]);

    let value = evaluate(&hosted_app(), &mut prompter, Some(&prior))
        .unwrap()
        .value()
        .unwrap();
    assert_eq!(
        value,
        json!({"hostingType": "lambda", "lambdaArn": "arn:aws:lambda:1"})
    );

    assert_eq!(
        prompter.asked()[0].options,
        vec![
            "Edit Hosting Type: webhook",
            "Edit Webhook URL: https://hook.example",
            "Finish editing App.",
            "Cancel",
        ]
    );
    assert_eq!(
        prompter.asked()[3].options,
        vec![
            "Edit Hosting Type: lambda",
            "Edit Lambda ARN: arn:aws:lambda:1",
            "Finish editing App.",
            "Cancel",
        ]
    );
}

#[test]
fn scopes_require_at_least_one() {
    let def: InputDefinition = checkbox_def("Scopes", ["r:devices:*", "w:devices:*"])
        .validate(at_least_one("scope"))
        .into();
    let mut prompter = ScriptedPrompter::new([
        Answer::labels(Vec::<String>::new()),
        Answer::labels(["w:devices:*", "r:devices:*"]),
    ]);

    let value = evaluate(&def, &mut prompter, None).unwrap().value().unwrap();
    assert_eq!(value, json!(["r:devices:*", "w:devices:*"]));
    assert_eq!(prompter.messages(), ["At least one scope is required."]);
}

#[test]
fn single_scope_checkbox_yields_a_one_element_list() {
    let def: InputDefinition = checkbox_def("Scopes", ["r:devices:*"])
        .validate(at_least_one("scope"))
        .into();
    let mut prompter = ScriptedPrompter::new([Answer::labels(["r:devices:*"])]);

    let value = evaluate(&def, &mut prompter, None).unwrap().value().unwrap();
    assert_eq!(value, json!(["r:devices:*"]));
    assert_eq!(prompter.asked()[0].question, "Select Scopes.");
    assert_eq!(prompter.asked()[0].options, vec!["r:devices:*"]);
    assert!(prompter.messages().is_empty());
}

#[test]
fn redirect_uris_add_one_then_finish() {
    let def: InputDefinition = list_def(
        "Redirect URIs",
        string_def("Redirect URI").validate(localhost_or_https_validate),
    )
    .min_items(0)
    .max_items(10)
    .into();
    let mut prompter = ScriptedPrompter::new([
        Answer::label("Add Redirect URI."),
        Answer::text("http://example.com/callback"),
        Answer::text("https://app.example/callback"),
        Answer::label("Finish editing Redirect URIs."),
    ]);

    let value = evaluate(&def, &mut prompter, None).unwrap().value().unwrap();
    assert_eq!(value, json!(["https://app.example/callback"]));
    assert_eq!(
        prompter.messages(),
        ["https is required except for localhost"]
    );
    assert_eq!(
        prompter.asked()[3].options,
        vec![
            "Edit https://app.example/callback.",
            "Add Redirect URI.",
            "Finish editing Redirect URIs.",
            "Cancel",
        ]
    );
}

#[test]
fn select_returns_the_value_behind_a_label() {
    let def: InputDefinition = select_def(
        "Region",
        [
            Choice::new("United States", json!("us")),
            Choice::new("Europe", json!("eu")),
        ],
    )
    .into();
    let mut prompter = ScriptedPrompter::new([Answer::label("Europe")]);

    let value = evaluate(&def, &mut prompter, None).unwrap().value().unwrap();
    assert_eq!(value, json!("eu"));
    assert_eq!(prompter.asked()[0].question, "Select Region.");
    assert_eq!(
        prompter.asked()[0].options,
        vec!["United States", "Europe", "Cancel"]
    );
}

#[test]
fn computed_field_follows_its_source_on_edit() {
    let def: InputDefinition = object_def("Client")
        .field("displayName", string_def("Display Name"))
        .field(
            "slug",
            computed_def(|ctx| {
                Ok(json!(ctx
                    .field_str("displayName")
                    .unwrap_or_default()
                    .to_lowercase()
                    .replace(' ', "-")))
            }),
        )
        .into();
    let prior = json!({"displayName": "Old Name", "slug": "old-name"});
    let mut prompter = ScriptedPrompter::new([
        Answer::label("Edit Display Name: Old Name"),
        Answer::text("New Name"),
        Answer::label("Finish editing Client."),
    ]);

    let value = evaluate(&def, &mut prompter, Some(&prior)).unwrap().value().unwrap();
    assert_eq!(value, json!({"displayName": "New Name", "slug": "new-name"}));
    // Computed values are never offered for editing.
    assert_eq!(
        prompter.asked()[0].options,
        vec!["Edit Display Name: Old Name", "Finish editing Client.", "Cancel"]
    );
}
