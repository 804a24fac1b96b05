use async_graphql::{Context, Guard, Result};

use crate::models::mentor::Mentor;
use crate::models::student::Student;

pub struct StudentLoggedIn;

#[async_trait::async_trait]
impl Guard for StudentLoggedIn {
    async fn check(&self, ctx: &Context<'_>) -> Result<()> {
        if ctx.data_opt::<Student>().is_some() {
            Ok(())
        } else {
            Err("Student must be logged in".into())
        }
    }
}

pub struct MentorLoggedIn;

#[async_trait::async_trait]
impl Guard for MentorLoggedIn {
    async fn check(&self, ctx: &Context<'_>) -> Result<()> {
        if ctx.data_opt::<Mentor>().is_some() {
            Ok(())
        } else {
            Err("Mentor must be logged in".into())
        }
    }
}
