//! Help and version text

/// Shown on interactive start and for blank lines
pub const SHORT_HELP: &str = "Type an expression, 'help', or 'quit'.";

/// Printed by `--version` after the name and version
pub const LICENSE: &str = "\
Copyright (C) The mucalc authors
License MIT OR Apache-2.0.
This is free software: you are free to change and redistribute it.
There is NO WARRANTY, to the extent permitted by law.";

macro_rules! core_help {
    () => {
        "\
Evaluates mathematical expression(s) and prints the results.
Expressions can be given as arguments, read from an input stream, or
typed interactively.
Variables can be used without explicit declaration. Separating multiple
expressions with commas is supported. The first result of the previous
expression is available as _.
Available constants:
  pi, e
Available functions:
  deg, rad,
  sin, asin, cos, acos, tan, atan, atan2,
  sinh, asinh, cosh, acosh, tanh, atanh,
  pow, exp, exp2, exp10, log, ln, log2, log10, sqrt, cbrt,
  abs, sign, fract, int, ceil, floor, round, rint, trunc, mod,
  min, max, sum, avg, med, median,
  clamp, step, smoothstep, mix,
  seed, random, gaussian
Available operators:
  ^, *, /, %, +, -, ==, !=, <, >, <=, >=, ||, &&, ?:,
  =, +=, -=, *=, /=
Expression examples:
  sin(pi/2)
  sin(rad(90))
  a = 2^3 + 2
  b = sqrt(49) * 2 + 6
  sin(2 * pi) + a * b / log10(a^(b/4)) + cos(rad(12*(a+b))) + sign(a)"
    };
}

/// Interactive `help`
pub const CORE_HELP: &str = core_help!();

/// Printed by `--help` after the generated usage and options
pub const AFTER_HELP: &str = concat!(
    core_help!(),
    "\n\nReport bugs to the mucalc issue tracker."
);

/// `mucalc version X.Y.Z`
pub fn short_version() -> String {
    format!("mucalc version {}", env!("CARGO_PKG_VERSION"))
}

/// Full `--version` output
pub fn long_version() -> String {
    format!("{}\n{}\n", short_version(), LICENSE)
}
