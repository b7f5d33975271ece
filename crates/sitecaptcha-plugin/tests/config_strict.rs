#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

mod common;

use std::fs;

use sitecaptcha_core::PathPolicy;
use sitecaptcha_plugin::config::{self, SiteRecaptchaConfig};

#[test]
fn missing_plugin_config_is_default() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = config::load_plugin_config(dir.path()).expect("missing file is fine");
    assert!(!cfg.disabled);
    assert!(cfg.forms.is_empty());
}

#[test]
fn plugin_config_parses_forms_list() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(
        dir.path().join(config::PLUGIN_CONFIG_FILE),
        r#"
forms:
  - "login,signup": true
    contact:
      "*": true
  - about: false
"#,
    )
    .unwrap();

    let cfg = config::load_plugin_config(dir.path()).unwrap();
    assert_eq!(cfg.forms.len(), 2);
    assert_eq!(cfg.forms[0].get("login,signup"), Some(&PathPolicy::Enforced(true)));
    assert_eq!(cfg.forms[1].get("about"), Some(&PathPolicy::Enforced(false)));
}

#[test]
fn malformed_plugin_config_errors() {
    let err = config::load_plugin_config_from_str("disabled: maybe\n").expect_err("must fail");
    assert_eq!(err.client_code().as_str(), "CONFIG");

    let err = config::load_plugin_config_from_str("formz: []\n").expect_err("typo must fail");
    assert_eq!(err.client_code().as_str(), "CONFIG");

    let err = config::load_plugin_config_from_str("forms:\n  - login: 3\n").expect_err("bad policy");
    assert_eq!(err.client_code().as_str(), "CONFIG");
}

#[test]
fn empty_plugin_config_is_default() {
    let cfg = config::load_plugin_config_from_str("\n").unwrap();
    assert!(!cfg.disabled);
}

#[test]
fn site_without_section_has_no_recaptcha() {
    let site = common::site("acme", &["acme.test"], "theme: dark\n");
    assert!(SiteRecaptchaConfig::from_site(&site).unwrap().is_none());
}

#[test]
fn site_section_parses_with_defaults() {
    let site = common::site(
        "acme",
        &[],
        r#"
recaptcha:
  private_key: "secret"
  site_key: "public"
  forms:
    contact: true
"#,
    );
    let cfg = SiteRecaptchaConfig::from_site(&site).unwrap().unwrap();
    assert_eq!(cfg.private_key, "secret");
    assert_eq!(cfg.site_key, "public");
    assert_eq!(cfg.forms.get("contact"), Some(&PathPolicy::Enforced(true)));
    assert!(cfg.verify_url.ends_with("/recaptcha/api/siteverify"));
    assert!(cfg.min_score.is_none());
}

#[test]
fn site_section_missing_credentials_fails() {
    let site = common::site("acme", &[], "recaptcha:\n  private_key: \"secret\"\n");
    let err = SiteRecaptchaConfig::from_site(&site).expect_err("site_key required");
    assert_eq!(err.client_code().as_str(), "CONFIG");
    assert!(err.to_string().contains("acme"));

    let site = common::site("acme", &[], "recaptcha:\n  private_key: \"\"\n  site_key: \"k\"\n");
    assert!(SiteRecaptchaConfig::from_site(&site).is_err());
}

#[test]
fn site_section_rejects_out_of_range_score() {
    let site = common::site(
        "acme",
        &[],
        "recaptcha:\n  private_key: a\n  site_key: b\n  min_score: 1.5\n",
    );
    assert!(SiteRecaptchaConfig::from_site(&site).is_err());
}

#[test]
fn sites_file_validation() {
    let ok = r#"
version: 1
sites:
  - name: acme
    hosts: ["acme.test"]
    config:
      recaptcha:
        private_key: a
        site_key: b
  - name: blog
"#;
    let sites = config::load_sites_from_str(ok).unwrap();
    assert_eq!(sites.sites.len(), 2);
    assert_eq!(sites.sites[0].hosts, vec!["acme.test".to_string()]);

    let dup = "version: 1\nsites:\n  - name: a\n  - name: a\n";
    assert!(config::load_sites_from_str(dup).is_err());

    let bad_version = "version: 2\nsites:\n  - name: a\n";
    assert!(config::load_sites_from_str(bad_version).is_err());

    let empty = "version: 1\nsites: []\n";
    assert!(config::load_sites_from_str(empty).is_err());
}
