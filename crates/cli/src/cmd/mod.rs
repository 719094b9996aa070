pub mod create_repo;
pub mod deploy;
pub mod grant;
pub mod inspect_tx;
pub mod preflight;
pub mod publish;
