use anyhow::Result;

use crate::session::Session;

pub fn run(token: Option<String>) -> Result<()> {
    match token {
        Some(access_token) => {
            Session { access_token }.save()?;
            println!("Token saved.");
        }
        None => {
            Session::clear()?;
            println!("Token cleared.");
        }
    }

    Ok(())
}
