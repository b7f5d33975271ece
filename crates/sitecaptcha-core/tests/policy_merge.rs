#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::collections::BTreeMap;

use sitecaptcha_core::policy::{expand_keys, merge, FormPolicyMap, PathPolicy};

fn yaml(s: &str) -> FormPolicyMap {
    serde_yaml::from_str(s).expect("valid form map")
}

#[test]
fn comma_keys_expand_to_one_entry_per_segment() {
    let raw = yaml(
        r#"
"login, signup ,,contact": true
"#,
    );
    let out = expand_keys(&raw, true);

    assert_eq!(out.len(), 3);
    for p in ["login", "signup", "contact"] {
        assert_eq!(out.get(p), Some(&PathPolicy::Enforced(true)), "path {p}");
    }
    assert!(!out.contains("login, signup ,,contact"));
}

#[test]
fn comma_keys_keep_shared_per_field_value() {
    let raw = yaml(
        r#"
"a,b":
  email: true
"#,
    );
    let out = expand_keys(&raw, true);
    let expected = PathPolicy::PerField(BTreeMap::from([("email".to_string(), true)]));
    assert_eq!(out.get("a"), Some(&expected));
    assert_eq!(out.get("b"), Some(&expected));
}

#[test]
fn unset_comma_value_defaults_to_enforced_when_enabled() {
    let raw = yaml(
        r#"
"login,signup":
"#,
    );
    let on = expand_keys(&raw, true);
    assert_eq!(on.get("login"), Some(&PathPolicy::Enforced(true)));

    let off = expand_keys(&raw, false);
    assert_eq!(off.get("signup"), Some(&PathPolicy::Unset));
}

#[test]
fn plain_keys_are_copied_unchanged() {
    let raw = yaml(
        r#"
"/login":
contact: false
"#,
    );
    let out = expand_keys(&raw, true);
    assert_eq!(out.get("login"), Some(&PathPolicy::Unset));
    assert_eq!(out.get("contact"), Some(&PathPolicy::Enforced(false)));
}

#[test]
fn site_entry_overrides_global_default() {
    let global = vec![yaml("contact: true\nlogin: true\n")];
    let site = yaml("contact: false\n");

    let merged = merge(&global, Some(&site), true);
    assert_eq!(merged.get("contact"), Some(&PathPolicy::Enforced(false)));
    assert_eq!(merged.get("login"), Some(&PathPolicy::Enforced(true)));
}

#[test]
fn later_global_catalog_wins_and_inputs_are_untouched() {
    let global = vec![yaml("\"a,b\": true\n"), yaml("b: false\n")];
    let before = global.clone();

    let merged = merge(&global, None, true);
    assert_eq!(merged.get("a"), Some(&PathPolicy::Enforced(true)));
    assert_eq!(merged.get("b"), Some(&PathPolicy::Enforced(false)));
    assert_eq!(global, before);
}

#[test]
fn sites_get_independent_maps() {
    let global = vec![yaml("login: true\n")];
    let a = merge(&global, Some(&yaml("signup: true\n")), true);
    let b = merge(&global, None, true);

    assert!(a.contains("signup"));
    assert!(!b.contains("signup"));
    assert_eq!(global[0].len(), 1);
}

#[test]
fn malformed_policy_value_is_rejected_at_load() {
    let err = serde_yaml::from_str::<FormPolicyMap>("login: 42\n");
    assert!(err.is_err());

    let err = serde_yaml::from_str::<FormPolicyMap>("login:\n  email: yes-please\n");
    assert!(err.is_err());
}
