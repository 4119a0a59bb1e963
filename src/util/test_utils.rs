use crate::{
    ir::BlockTable,
    lexer, lower, parser,
    util::fmt::{dump, tree},
    Error,
};

/// Each variant contains the input.
pub enum Test<'src> {
    Parser(&'src str),
    Lower(&'src str),
}

pub enum Assertion {
    TreeOk(&'static str),
    ExpectedError(&'static str),
}

/// Runs the pipeline up to the stage selected by `test`, returning the
/// printed result of that stage or the formatted error that stopped it.
pub fn run_pipeline(test: Test<'_>) -> Result<String, String> {
    let run = |src: &str, lower_it: bool| -> Result<String, Error> {
        let tokens = lexer::lex_in_new(src)?;
        let program = parser::parse_program(src, &tokens)?;
        if !lower_it {
            return Ok(tree::print_program_string(&program));
        }
        let mut table = BlockTable::new();
        lower::lower_program(&mut table, &program)?;
        Ok(dump::print_ir_string(&table))
    };
    let result = match test {
        Test::Parser(src) => run(src, false),
        Test::Lower(src) => run(src, true),
    };
    result.map_err(|error| error.to_string())
}

/// Wraps `return;` in `depth` compound statements.
pub fn nested_return(depth: usize, open: &str, close: &str) -> String {
    format!("{}return;{}", open.repeat(depth), close.repeat(depth))
}

#[track_caller]
pub fn run_assertion(assertion: Assertion, actual: &Result<String, String>) {
    match (assertion, actual) {
        (Assertion::TreeOk(expected_tree), Ok(tree)) => {
            ::pretty_assertions::assert_eq!(tree.trim(), expected_tree.trim());
        }
        (Assertion::ExpectedError(expected_error), Err(error)) => {
            ::pretty_assertions::assert_eq!(error, expected_error);
        }
        (Assertion::TreeOk(_), Err(error)) => panic!("expected a tree, got error: {error}"),
        (Assertion::ExpectedError(_), Ok(tree)) => panic!("expected an error, got tree:\n{tree}"),
    }
}

macro_rules! pipeline_tests {
    (
        use $test_kind:ident;

        $(
            fn $test_name:ident() {
                let src = $source:expr;
                $($assertions_tt:tt)*
            }
        )*
    ) => {
        $(
            #[test]
            fn $test_name() {
                let src = $source;
                let test: crate::util::test_utils::Test<'_> =
                    pipeline_tests!(@@get_test($test_kind), &src);
                let actual = crate::util::test_utils::run_pipeline(test);
                pipeline_tests!(@@expand_assertions, &actual, [$($assertions_tt)*]);
            }
        )*
    };

    (@@expand_assertions, $actual:expr, []) => {};
    (@@expand_assertions, $actual:expr, [
        let $assertion:ident = $assertion_expected:expr;
        $($rest_assertions_tt:tt)*
    ]) => {
        crate::util::test_utils::run_assertion(
            pipeline_tests!(@@assertion, $assertion, $assertion_expected),
            $actual,
        );
        pipeline_tests!(@@expand_assertions, $actual, [$($rest_assertions_tt)*]);
    };

    (@@assertion, tree_ok, $expected:expr) => {
        crate::util::test_utils::Assertion::TreeOk(::indoc::indoc! { $expected })
    };
    (@@assertion, expected_error, $expected:expr) => {
        crate::util::test_utils::Assertion::ExpectedError($expected)
    };

    (@@get_test(parser), $source:expr) => {
        crate::util::test_utils::Test::Parser($source)
    };
    (@@get_test(lower), $source:expr) => {
        crate::util::test_utils::Test::Lower($source)
    };
}
pub(crate) use pipeline_tests;
