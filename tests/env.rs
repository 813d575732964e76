mod common;
use common::{manifest, setup};

use std::collections::BTreeMap;

use rendercat::{load, BotConfig, ErrorKind};

fn operator(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
}

#[test]
fn bot_secret_keys() {
    setup();
    let svc = load(manifest("render.yaml")).unwrap();
    assert_eq!(svc.secret_keys(), vec!["BOT_TOKEN", "TELEGRAM_BOT_TOKEN"]);
}

#[test]
fn bot_starts_from_injected_env() {
    setup();
    let svc = load(manifest("render.yaml")).unwrap();
    let store = operator(&[("BOT_TOKEN", "123456:AAE-token"), ("TELEGRAM_BOT_TOKEN", "123456:AAE-token")]);
    let env = svc.resolve_env(&store).unwrap();
    assert_eq!(env["PYTHON_VERSION"], "3.11");

    let conf = BotConfig::from_vars(&env).unwrap();
    assert_eq!(conf.port, 10000);
    assert!(!conf.debug);
    assert_eq!(conf.webhook_endpoint(),
        Some("https://telegram-deployment-bot.onrender.com/webhook".into()));
}

#[test]
fn bot_refuses_to_start_without_secrets() {
    setup();
    let svc = load(manifest("render.yaml")).unwrap();
    let err = svc.resolve_env(&operator(&[("BOT_TOKEN", "1:a")])).unwrap_err();
    match err.kind() {
        ErrorKind::MissingSecrets(keys) => assert_eq!(keys, &vec!["TELEGRAM_BOT_TOKEN".to_string()]),
        k => panic!("unexpected error {:?}", k),
    }
}
