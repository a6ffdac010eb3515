mod guard;
pub use guard::Protected;

mod shell;
pub use shell::Shell;

mod leads;
pub use leads::Leads;

mod user_details;
pub use user_details::UserDetails;

mod login;
pub use login::Login;

mod terms;
pub use terms::Terms;

mod not_found;
pub use not_found::NotFound;
