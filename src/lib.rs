pub mod ast;
pub mod environment;
pub mod interpreter;
pub mod validator;
pub mod value;
