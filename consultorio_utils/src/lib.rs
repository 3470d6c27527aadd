mod macros;

/// Returns the version of the consultorio backend.
pub fn consultorio_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

pub trait Apply {
    /// Applies the function `f` only if `value` is `Some(...)` and provides the
    /// contained value to `f`.
    ///
    /// #### Example
    /// ```rust
    /// # use consultorio_utils::Apply;
    /// fn reply_to(subject: String, sender: Option<&str>) -> String {
    ///     subject.apply_map(sender, |slf, sender| format!("{slf} ({sender})"))
    /// }
    /// assert_eq!(reply_to("Contato".into(), None), "Contato");
    /// assert_eq!(reply_to("Contato".into(), Some("Ana")), "Contato (Ana)");
    /// ```
    fn apply_map<U>(self, value: Option<U>, f: impl FnOnce(Self, U) -> Self) -> Self
    where
        Self: Sized,
    {
        if let Some(value) = value {
            f(self, value)
        } else {
            self
        }
    }
}

impl<T> Apply for T {}
