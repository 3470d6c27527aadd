use consultorio_core_contact_impl::ContactServiceImpl;
use consultorio_email_impl::EmailServiceImpl;
use consultorio_shared_impl::time::TimeServiceImpl;
use consultorio_templates_impl::TemplateServiceImpl;

pub type Email = EmailServiceImpl;
pub type Template = TemplateServiceImpl;
pub type Time = TimeServiceImpl;

pub type Contact = ContactServiceImpl<Email, Template, Time>;

pub type RestServer = consultorio_api_rest::RestServer<Contact>;
