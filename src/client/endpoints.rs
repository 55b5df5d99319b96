// src/client/endpoints.rs

//! Typed wrappers for every REST endpoint.
//!
//! Public reads attach the token when present; mutations and user
//! management require a logged-in session.

use reqwest::Method;
use reqwest::multipart::{Form, Part};

use crate::client::{ApiClient, Auth, RequestOptions};
use crate::error::Result;
use crate::models::{
    Article, ArticleInput, ArticleSummary, Category, Created, HomepageSection, LoginRequest,
    LoginResponse, MediaAsset, MediaUpload, SectionInput, SectionItem, SectionItemInput, Tag,
    TaxonomyInput, User, UserInput,
};
use crate::query::{ArticleQuery, MediaQuery};
use crate::utils::url::encode_segment;

const LOGIN: &str = "/api/auth/login";
const ARTICLES: &str = "/api/articles/";
const CATEGORIES: &str = "/api/categories/";
const TAGS: &str = "/api/tags/";
const USERS: &str = "/api/users/";
const MEDIA: &str = "/api/media/";
const MEDIA_UPLOAD: &str = "/api/media/upload";
const SECTIONS: &str = "/api/homepage_sections/";
const SECTION_ITEMS: &str = "/api/homepage_section_items/";

fn item_path(collection: &str, id: &str) -> String {
    format!("{collection}{}", encode_segment(id))
}

impl ApiClient {
    // --- Auth ---

    /// Log in and store the issued token in the session.
    ///
    /// A 401 here means bad credentials and is returned as an HTTP error
    /// without signalling session expiry.
    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let options = RequestOptions::new()
            .auth(Auth::None)
            .without_session_signals()
            .json(&LoginRequest { email, password })?;
        let response: LoginResponse = self
            .request(Method::POST, LOGIN, options)
            .await?
            .decode(LOGIN)?;
        self.session().login(response.access_token).await
    }

    /// Forget the credential locally.
    pub async fn logout(&self) -> Result<()> {
        self.session().clear().await
    }

    // --- Articles ---

    pub async fn list_articles(&self, query: &ArticleQuery) -> Result<Vec<ArticleSummary>> {
        self.get_json(ARTICLES, query.to_pairs(), Auth::Optional).await
    }

    pub async fn get_article(&self, slug: &str) -> Result<Article> {
        self.get_json(&item_path(ARTICLES, slug), Vec::new(), Auth::Optional)
            .await
    }

    pub async fn get_article_by_id(&self, id: &str) -> Result<Article> {
        let path = format!("{ARTICLES}by-id/{}", encode_segment(id));
        self.get_json(&path, Vec::new(), Auth::Optional).await
    }

    pub async fn create_article(&self, article: &ArticleInput) -> Result<Article> {
        self.send_json(Method::POST, ARTICLES, article).await
    }

    pub async fn update_article(&self, id: &str, article: &ArticleInput) -> Result<Article> {
        self.send_json(Method::PUT, &item_path(ARTICLES, id), article)
            .await
    }

    pub async fn delete_article(&self, id: &str) -> Result<()> {
        self.delete(&item_path(ARTICLES, id)).await
    }

    // --- Categories ---

    pub async fn list_categories(&self) -> Result<Vec<Category>> {
        self.get_json(CATEGORIES, Vec::new(), Auth::Optional).await
    }

    pub async fn get_category(&self, slug: &str) -> Result<Category> {
        self.get_json(&item_path(CATEGORIES, slug), Vec::new(), Auth::Optional)
            .await
    }

    pub async fn create_category(&self, category: &TaxonomyInput) -> Result<Created> {
        self.send_json(Method::POST, CATEGORIES, category).await
    }

    pub async fn update_category(&self, id: &str, category: &TaxonomyInput) -> Result<Category> {
        self.send_json(Method::PUT, &item_path(CATEGORIES, id), category)
            .await
    }

    pub async fn delete_category(&self, id: &str) -> Result<()> {
        self.delete(&item_path(CATEGORIES, id)).await
    }

    // --- Tags ---

    pub async fn list_tags(&self) -> Result<Vec<Tag>> {
        self.get_json(TAGS, Vec::new(), Auth::Optional).await
    }

    pub async fn create_tag(&self, tag: &TaxonomyInput) -> Result<Created> {
        self.send_json(Method::POST, TAGS, tag).await
    }

    pub async fn update_tag(&self, id: &str, tag: &TaxonomyInput) -> Result<Tag> {
        self.send_json(Method::PUT, &item_path(TAGS, id), tag).await
    }

    pub async fn delete_tag(&self, id: &str) -> Result<()> {
        self.delete(&item_path(TAGS, id)).await
    }

    // --- Users ---

    pub async fn list_users(&self) -> Result<Vec<User>> {
        self.get_json(USERS, Vec::new(), Auth::Required).await
    }

    pub async fn create_user(&self, user: &UserInput) -> Result<Created> {
        self.send_json(Method::POST, USERS, user).await
    }

    pub async fn update_user(&self, id: &str, user: &UserInput) -> Result<User> {
        self.send_json(Method::PUT, &item_path(USERS, id), user).await
    }

    pub async fn delete_user(&self, id: &str) -> Result<()> {
        self.delete(&item_path(USERS, id)).await
    }

    // --- Media ---

    pub async fn list_media(&self, query: &MediaQuery) -> Result<Vec<MediaAsset>> {
        self.get_json(MEDIA, query.to_pairs(), Auth::Optional).await
    }

    /// Upload a file as multipart (`file` plus optional metadata fields).
    pub async fn upload_media(&self, upload: MediaUpload) -> Result<MediaAsset> {
        let mime = upload
            .mime_type
            .clone()
            .or_else(|| upload.guess_mime().map(String::from));

        let mut form = Form::new();
        for (key, value) in upload.metadata_fields() {
            form = form.text(key, value);
        }

        let mut part = Part::bytes(upload.bytes).file_name(upload.file_name);
        if let Some(mime) = mime {
            part = part.mime_str(&mime)?;
        }
        form = form.part("file", part);

        let options = RequestOptions::new().auth(Auth::Required).multipart(form);
        self.request(Method::POST, MEDIA_UPLOAD, options)
            .await?
            .decode(MEDIA_UPLOAD)
    }

    // --- Homepage sections ---

    pub async fn list_sections(&self) -> Result<Vec<HomepageSection>> {
        self.get_json(SECTIONS, Vec::new(), Auth::Optional).await
    }

    pub async fn create_section(&self, section: &SectionInput) -> Result<Created> {
        self.send_json(Method::POST, SECTIONS, section).await
    }

    pub async fn update_section(&self, id: &str, section: &SectionInput) -> Result<HomepageSection> {
        self.send_json(Method::PUT, &item_path(SECTIONS, id), section)
            .await
    }

    pub async fn delete_section(&self, id: &str) -> Result<()> {
        self.delete(&item_path(SECTIONS, id)).await
    }

    pub async fn list_section_items(&self, section_id: &str) -> Result<Vec<SectionItem>> {
        let path = format!("{SECTION_ITEMS}section/{}", encode_segment(section_id));
        self.get_json(&path, Vec::new(), Auth::Optional).await
    }

    pub async fn create_section_item(&self, item: &SectionItemInput) -> Result<Created> {
        self.send_json(Method::POST, SECTION_ITEMS, item).await
    }

    pub async fn update_section_item(
        &self,
        id: &str,
        item: &SectionItemInput,
    ) -> Result<SectionItem> {
        self.send_json(Method::PUT, &item_path(SECTION_ITEMS, id), item)
            .await
    }

    pub async fn delete_section_item(&self, id: &str) -> Result<()> {
        self.delete(&item_path(SECTION_ITEMS, id)).await
    }
}
