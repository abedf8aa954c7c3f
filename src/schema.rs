use async_graphql::{
    ComplexObject, EmptyMutation, EmptySubscription, Error, Object, Result, Schema, SimpleObject,
    ID,
};
use gqlmetrics_core::Middleware;

pub type DemoSchema = Schema<Query, EmptyMutation, EmptySubscription>;

#[derive(SimpleObject, Clone)]
#[graphql(complex)]
pub struct User {
    id: ID,
    username: String,
    #[graphql(skip)]
    email: Option<String>,
}

#[ComplexObject]
impl User {
    /// Fails for users without an address.
    async fn email(&self) -> Result<String> {
        self.email
            .clone()
            .ok_or_else(|| Error::new(format!("User '{}' has no email address.", self.username)))
    }
}

fn users() -> Vec<User> {
    vec![
        User {
            id: "1234".into(),
            username: "Me".to_string(),
            email: Some("me@example.com".to_string()),
        },
        User {
            id: "5678".into(),
            username: "Anonymous".to_string(),
            email: None,
        },
    ]
}

pub struct Query;

#[Object]
impl Query {
    async fn users(&self) -> Vec<User> {
        users()
    }

    async fn user(&self, id: ID) -> Option<User> {
        users().into_iter().find(|user| user.id == id)
    }
}

pub fn build(middleware: Middleware) -> DemoSchema {
    Schema::build(Query, EmptyMutation, EmptySubscription)
        .extension(middleware)
        .finish()
}
