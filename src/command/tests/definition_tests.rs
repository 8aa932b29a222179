//! Unit tests for command definitions and arity inference.

use rstest::rstest;

use crate::command::domain::{Arity, CommandDefinition, CommandInfo};

fn args(values: &[&str]) -> Vec<String> {
    values.iter().map(|value| (*value).to_owned()).collect()
}

#[rstest]
#[case(None, Arity::Exact(0))]
#[case(Some(""), Arity::Exact(0))]
#[case(Some("<task>"), Arity::Exact(1))]
#[case(Some("<one> <two>"), Arity::Exact(2))]
#[case(Some("[state]"), Arity::Between { min: 0, max: 1 })]
#[case(Some("<name> [tag]"), Arity::Between { min: 1, max: 2 })]
#[case(Some("<name> <tags>..."), Arity::AtLeast(1))]
fn arity_is_inferred_from_usage(#[case] usage: Option<&str>, #[case] expected: Arity) {
    assert_eq!(Arity::from_usage(usage), expected);
}

#[rstest]
#[case(Arity::Exact(1), 0, false)]
#[case(Arity::Exact(1), 1, true)]
#[case(Arity::Exact(1), 2, false)]
#[case(Arity::Between { min: 0, max: 1 }, 0, true)]
#[case(Arity::Between { min: 0, max: 1 }, 2, false)]
#[case(Arity::AtLeast(1), 0, false)]
#[case(Arity::AtLeast(1), 5, true)]
fn arity_accepts_expected_counts(#[case] arity: Arity, #[case] count: usize, #[case] expected: bool) {
    assert_eq!(arity.accepts(count), expected);
}

#[rstest]
fn variadic_usage_accepts_extra_arguments() {
    let definition = CommandDefinition::new("note").with_args("<text>...");

    assert!(definition.accepts(&args(&["one", "two", "three"])));
    assert!(!definition.accepts(&args(&[])));
}

#[rstest]
#[case(&[], true)]
#[case(&["running"], true)]
#[case(&["sleeping"], false)]
#[case(&["running", "paused"], false)]
fn subcommands_restrict_first_argument(#[case] supplied: &[&str], #[case] expected: bool) {
    let definition = CommandDefinition::new("tasks")
        .with_args("[state]")
        .with_subcommands(["unstarted", "running", "paused", "finished"]);

    assert_eq!(definition.accepts(&args(supplied)), expected);
}

#[rstest]
fn usage_includes_program_name_and_arguments() {
    let with_args = CommandDefinition::new("start").with_args("<task>");
    let without_args = CommandDefinition::new("help");

    assert_eq!(with_args.usage("timecard"), "timecard start <task>");
    assert_eq!(without_args.usage("timecard"), "timecard help");
}

#[rstest]
fn signature_ignores_blank_usage() {
    let info = CommandInfo::new().with_args("   ");

    assert_eq!(info.signature("help"), "help");
}
