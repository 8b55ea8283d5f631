// tests/properties.rs

use proptest::prelude::*;
use ssm_run::command::{CommandHandle, LogPaths, SENTINEL_EXIT_CODE, wrap_script};
use ssm_run::dispatch::status::resolve_exit_code;
use ssm_run::types::CommandStatus;
use ssm_run::workflow::escape_data;
use ssm_run_test_utils::builders::snapshot;

const WAITING: [&str; 3] = ["Pending", "InProgress", "Delayed"];

fn key_segment() -> impl Strategy<Value = String> {
    "[A-Za-z0-9._-]{1,24}"
}

proptest! {
    #[test]
    fn log_keys_are_built_from_their_parts(
        prefix in "[A-Za-z0-9._-]{1,16}(/[A-Za-z0-9._-]{1,16}){0,2}",
        command_id in key_segment(),
        target_id in key_segment(),
    ) {
        let paths = LogPaths::new(&prefix, &CommandHandle::new(&command_id, &target_id));
        let base = format!("{prefix}/{command_id}/{target_id}/awsrunShellScript/0.awsrunShellScript");

        prop_assert_eq!(paths.stdout(), format!("{base}/stdout"));
        prop_assert_eq!(paths.stderr(), format!("{base}/stderr"));
        prop_assert!(!paths.base().starts_with('/'));
    }

    #[test]
    fn only_waiting_statuses_keep_polling(status in "[A-Za-z]{0,12}") {
        let parsed = CommandStatus::from_wire(Some(&status));
        prop_assert_eq!(parsed.is_terminal(), !WAITING.contains(&status.as_str()));
    }

    #[test]
    fn exit_code_prefers_requery_then_terminal(
        terminal_code in proptest::option::of(-1i32..512),
        requery_code in proptest::option::of(-1i32..512),
    ) {
        let terminal = snapshot("Failed", terminal_code);
        let requery = snapshot("Failed", requery_code);

        let resolved = resolve_exit_code(&terminal, Some(&requery));
        let expected = requery_code.or(terminal_code).unwrap_or(SENTINEL_EXIT_CODE);
        prop_assert_eq!(resolved, expected);
    }

    #[test]
    fn user_commands_are_embedded_verbatim(commands in "[ -~\n]{0,200}") {
        let script = wrap_script("ubuntu", &commands);
        let expected = format!("exec 2>&1\n{commands}\nINNER\n");
        prop_assert!(script.ends_with(&expected));
    }

    #[test]
    fn escaped_messages_stay_on_one_line(message in "\\PC*[\r\n%]?\\PC*") {
        let escaped = escape_data(&message);
        prop_assert!(!escaped.contains('\n'));
        prop_assert!(!escaped.contains('\r'));
    }
}
