use consultorio_assets::templates;
use serde::Serialize;

#[cfg_attr(feature = "mock", mockall::automock)]
pub trait TemplateService: Send + Sync + 'static {
    /// Render the given template.
    ///
    /// All interpolated values are html-escaped.
    fn render<T: Template + 'static>(&self, template: &T) -> anyhow::Result<String>;
}

#[cfg(feature = "mock")]
impl MockTemplateService {
    pub fn with_render<T: Template + Send + PartialEq + std::fmt::Debug + 'static>(
        mut self,
        template: T,
        result: String,
    ) -> Self {
        self.expect_render()
            .once()
            .with(mockall::predicate::eq(template))
            .return_once(|_| Ok(result));
        self
    }
}

pub trait Template: Serialize {
    const NAME: &'static str;
    const TEMPLATE: &'static str;
}

/// Layout shared by all email templates, registered as `base.html`.
pub const BASE_TEMPLATE: (&str, &str) = ("base.html", templates::BASE_HTML);

macro_rules! templates {
    ($( $ident:ident ( $name:literal, $source:expr ), )* ) => {
        $(
            impl Template for $ident {
                const NAME: &'static str = $name;
                const TEMPLATE: &'static str = $source;
            }
        )*

        pub const TEMPLATES: &[(&str, &str)] = &[
            $( ($ident::NAME, $ident::TEMPLATE) ),*
        ];
    };
}

templates! {
    ContactMessageTemplate("contact_message.html", templates::CONTACT_MESSAGE_HTML),
}

/// Notification sent to the practice when a visitor submits the contact form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactMessageTemplate {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub subject: Option<String>,
    pub message: String,
    /// Already formatted for display, inserted without escaping.
    pub received_at: String,
    pub origin: String,
}
