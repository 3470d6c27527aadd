pub mod contact;
pub mod email_address;
pub mod email_id;
