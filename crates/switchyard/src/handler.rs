//! Action handler types.
//!
//! Actions are plain closures. The binder resolves and converts their
//! parameters, then calls the closure with the [`BoundArguments`] and a
//! [`Context`] carrying the invocation's argument store and display.
//!
//! A closure may return any [`IntoActionResult`] type:
//!
//! | Return type | Exit code |
//! |-------------|-----------|
//! | `()` | `0` |
//! | `i32` | the value |
//! | `Result<(), E>` | `0`, or the error |
//! | `Result<i32, E>` | the value, or the error |
//!
//! where `E: Into<anyhow::Error>`.
//!
//! # Example
//!
//! ```rust
//! use switchyard::{ActionHandler, BoundArguments, Context, FnAction};
//!
//! let mut handler = FnAction::new(|args: &BoundArguments, _ctx: &mut Context| {
//!     let name: String = args.get("name")?;
//!     anyhow::ensure!(!name.is_empty(), "name must not be empty");
//!     Ok::<_, anyhow::Error>(())
//! });
//! # let _ = &mut handler;
//! ```

use crate::args::ArgumentStore;
use crate::dispatch::BoundArguments;
use crate::display::Display;
use crate::verbosity::Verbosity;

/// Per-invocation state handed to an action.
///
/// This is the only way an action sees the argument store and display; the
/// group itself holds no reference to either between invocations.
pub struct Context<'a> {
    /// Group and action names of the invocation (e.g. `["Plugin", "Add"]`).
    pub command_path: Vec<String>,

    /// Everything the user supplied, for ad-hoc lenient lookups.
    pub args: &'a ArgumentStore,

    /// Output sink of the invocation.
    pub display: &'a mut dyn Display,
}

impl<'a> Context<'a> {
    pub fn new(
        command_path: Vec<String>,
        args: &'a ArgumentStore,
        display: &'a mut dyn Display,
    ) -> Self {
        Self {
            command_path,
            args,
            display,
        }
    }

    /// The command path joined with spaces.
    pub fn command(&self) -> String {
        self.command_path.join(" ")
    }

    /// Shorthand for `display.write_line`.
    pub fn write_line(&mut self, level: Verbosity, message: &str) {
        self.display.write_line(level, message);
    }
}

/// Result of running an action: an exit code or the action's error.
pub type ActionResult = Result<i32, anyhow::Error>;

/// Successful action return values.
pub trait IntoExitCode {
    fn into_exit_code(self) -> i32;
}

impl IntoExitCode for () {
    fn into_exit_code(self) -> i32 {
        0
    }
}

impl IntoExitCode for i32 {
    fn into_exit_code(self) -> i32 {
        self
    }
}

/// Types an action closure may return.
pub trait IntoActionResult {
    fn into_action_result(self) -> ActionResult;
}

impl<T, E> IntoActionResult for Result<T, E>
where
    T: IntoExitCode,
    E: Into<anyhow::Error>,
{
    fn into_action_result(self) -> ActionResult {
        self.map(IntoExitCode::into_exit_code).map_err(Into::into)
    }
}

impl IntoActionResult for () {
    fn into_action_result(self) -> ActionResult {
        Ok(0)
    }
}

impl IntoActionResult for i32 {
    fn into_action_result(self) -> ActionResult {
        Ok(self)
    }
}

/// An invocable action overload.
///
/// Implemented by [`FnAction`] for closures; implement it directly for
/// handlers that carry their own state.
pub trait ActionHandler {
    fn call(&mut self, args: &BoundArguments, ctx: &mut Context<'_>) -> ActionResult;
}

/// Wraps an `FnMut` closure as an [`ActionHandler`].
pub struct FnAction<F, R> {
    f: F,
    _phantom: std::marker::PhantomData<fn() -> R>,
}

impl<F, R> FnAction<F, R>
where
    F: FnMut(&BoundArguments, &mut Context<'_>) -> R,
    R: IntoActionResult,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<F, R> ActionHandler for FnAction<F, R>
where
    F: FnMut(&BoundArguments, &mut Context<'_>) -> R,
    R: IntoActionResult,
{
    fn call(&mut self, args: &BoundArguments, ctx: &mut Context<'_>) -> ActionResult {
        (self.f)(args, ctx).into_action_result()
    }
}

/// The fallback behavior of a command group.
///
/// Receives every supplied argument rendered as `key=value`.
pub trait DefaultHandler {
    fn call(&mut self, args: &[String], ctx: &mut Context<'_>) -> ActionResult;
}

/// Wraps an `FnMut` closure as a [`DefaultHandler`].
pub struct FnDefaultAction<F, R> {
    f: F,
    _phantom: std::marker::PhantomData<fn() -> R>,
}

impl<F, R> FnDefaultAction<F, R>
where
    F: FnMut(&[String], &mut Context<'_>) -> R,
    R: IntoActionResult,
{
    pub fn new(f: F) -> Self {
        Self {
            f,
            _phantom: std::marker::PhantomData,
        }
    }
}

impl<F, R> DefaultHandler for FnDefaultAction<F, R>
where
    F: FnMut(&[String], &mut Context<'_>) -> R,
    R: IntoActionResult,
{
    fn call(&mut self, args: &[String], ctx: &mut Context<'_>) -> ActionResult {
        (self.f)(args, ctx).into_action_result()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::BufferDisplay;
    use crate::Options;

    fn with_context<T>(f: impl FnOnce(&mut Context<'_>) -> T) -> T {
        let store = ArgumentStore::from_args(["Plugin", "Add", "-name:x"], &Options::default());
        let mut display = BufferDisplay::new(Verbosity::Normal);
        let mut ctx = Context::new(vec!["Plugin".into(), "Add".into()], &store, &mut display);
        f(&mut ctx)
    }

    #[test]
    fn test_context_command() {
        with_context(|ctx| {
            assert_eq!(ctx.command(), "Plugin Add");
            assert_eq!(ctx.args.get_str("name"), Some("x"));
        });
    }

    #[test]
    fn test_unit_return_is_success() {
        let mut handler = FnAction::new(|_a: &BoundArguments, _c: &mut Context<'_>| {});
        let result = with_context(|ctx| handler.call(&BoundArguments::default(), ctx));
        assert_eq!(result.unwrap(), 0);
    }

    #[test]
    fn test_i32_return_is_exit_code() {
        let mut handler = FnAction::new(|_a: &BoundArguments, _c: &mut Context<'_>| 42);
        let result = with_context(|ctx| handler.call(&BoundArguments::default(), ctx));
        assert_eq!(result.unwrap(), 42);
    }

    #[test]
    fn test_result_error_propagates() {
        let mut handler = FnAction::new(|_a: &BoundArguments, _c: &mut Context<'_>| {
            Err::<i32, _>(anyhow::anyhow!("boom"))
        });
        let result = with_context(|ctx| handler.call(&BoundArguments::default(), ctx));
        assert_eq!(result.unwrap_err().to_string(), "boom");
    }

    #[test]
    fn test_handler_can_write_to_display() {
        let mut handler = FnAction::new(|_a: &BoundArguments, ctx: &mut Context<'_>| {
            ctx.write_line(Verbosity::Quiet, "hello");
        });
        let store = ArgumentStore::default();
        let mut display = BufferDisplay::new(Verbosity::Normal);
        {
            let mut ctx = Context::new(Vec::new(), &store, &mut display);
            handler.call(&BoundArguments::default(), &mut ctx).unwrap();
        }
        assert_eq!(display.text(), vec!["hello"]);
    }

    #[test]
    fn test_default_action_receives_pairs() {
        let mut seen = Vec::new();
        {
            let mut handler = FnDefaultAction::new(|args: &[String], _c: &mut Context<'_>| {
                seen.extend_from_slice(args);
                Ok::<_, anyhow::Error>(-10)
            });
            let code = with_context(|ctx| handler.call(&["p=x".to_string()], ctx));
            assert_eq!(code.unwrap(), -10);
        }
        assert_eq!(seen, vec!["p=x"]);
    }

    #[test]
    fn test_stateful_handler() {
        struct Counter(u32);

        impl ActionHandler for Counter {
            fn call(&mut self, _args: &BoundArguments, _ctx: &mut Context<'_>) -> ActionResult {
                self.0 += 1;
                Ok(self.0 as i32)
            }
        }

        let mut counter = Counter(0);
        with_context(|ctx| {
            counter.call(&BoundArguments::default(), ctx).unwrap();
            counter.call(&BoundArguments::default(), ctx).unwrap();
        });
        assert_eq!(counter.0, 2);
    }
}
