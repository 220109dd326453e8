pub mod joke;
pub mod json_error;
pub mod login;
pub mod server_config;
pub mod session;
pub mod user;

pub use self::joke::{Joke, JokeView, NewJoke};
pub use self::json_error::ErrorResponse;
pub use self::login::{ActionData, FieldErrors, LoginFields, LoginType, UnknownLoginType};
pub use self::session::Session;
pub use self::user::User;
