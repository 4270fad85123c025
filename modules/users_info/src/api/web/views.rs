//! HTML pages. Templates are compiled into the binary.

use minijinja::{context, Environment};
use serde::Serialize;

use crate::contract::model::User;

/// Route prefix the image directory is served under.
pub const IMAGES_ROUTE: &str = "/images";

pub const ALL_USERS: &str = "all_users.html";
pub const ADD_USER: &str = "add_user.html";
pub const USER: &str = "user.html";
pub const UPDATE_USER: &str = "update_user.html";
pub const NOT_FOUND: &str = "not_found.html";

/// Template-facing projection of a user.
#[derive(Debug, Serialize)]
pub struct UserView {
    pub id: String,
    pub name: String,
    pub age: String,
    pub city: String,
    pub photo_url: String,
    pub created_at: String,
    pub updated_at: Vec<String>,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            age: user.age.clone(),
            city: user.city.clone(),
            photo_url: photo_url(&user.image_path),
            created_at: user.created_at.to_string(),
            updated_at: user.updated_at.iter().map(ToString::to_string).collect(),
        }
    }
}

/// External URLs and absolute paths are linked verbatim; everything else is
/// a file in the image directory.
pub fn photo_url(image_path: &str) -> String {
    if image_path.starts_with("http://")
        || image_path.starts_with("https://")
        || image_path.starts_with('/')
    {
        image_path.to_string()
    } else {
        format!("{IMAGES_ROUTE}/{image_path}")
    }
}

pub struct Views {
    env: Environment<'static>,
}

impl Views {
    pub fn new() -> Result<Self, minijinja::Error> {
        let mut env = Environment::new();
        env.add_template("layout.html", include_str!("../../../templates/layout.html"))?;
        env.add_template(ALL_USERS, include_str!("../../../templates/all_users.html"))?;
        env.add_template(ADD_USER, include_str!("../../../templates/add_user.html"))?;
        env.add_template(USER, include_str!("../../../templates/user.html"))?;
        env.add_template(UPDATE_USER, include_str!("../../../templates/update_user.html"))?;
        env.add_template(NOT_FOUND, include_str!("../../../templates/not_found.html"))?;
        Ok(Self { env })
    }

    pub fn all_users(&self, users: &[User]) -> Result<String, minijinja::Error> {
        let users: Vec<UserView> = users.iter().map(UserView::from).collect();
        self.env
            .get_template(ALL_USERS)?
            .render(context! { users => users })
    }

    pub fn add_user(&self) -> Result<String, minijinja::Error> {
        self.env.get_template(ADD_USER)?.render(context! {})
    }

    pub fn user(&self, user: &User) -> Result<String, minijinja::Error> {
        self.env
            .get_template(USER)?
            .render(context! { user => UserView::from(user) })
    }

    pub fn update_user(&self, user: &User) -> Result<String, minijinja::Error> {
        self.env
            .get_template(UPDATE_USER)?
            .render(context! { user => UserView::from(user) })
    }

    pub fn not_found(&self, id: &str) -> Result<String, minijinja::Error> {
        self.env
            .get_template(NOT_FOUND)?
            .render(context! { user_id => id })
    }
}
