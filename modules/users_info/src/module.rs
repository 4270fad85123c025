use std::path::{Path, PathBuf};
use std::sync::Arc;

use axum::Router;
use runtime::paths::home_dir::resolve_under;
use tower_http::services::ServeDir;
use tracing::{debug, info};

use crate::api::{rest, web};
use crate::config::UsersInfoConfig;
use crate::contract::client::UsersInfoApi;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::UsersInfoLocalClient;
use crate::infra::images::FsImageStore;
use crate::infra::storage::JsonFileUsersRepository;

/// The users module: record store, image store, service and both HTTP
/// surfaces, wired from one config section.
#[derive(Clone)]
pub struct UsersInfo {
    service: Arc<Service>,
    data_file: PathBuf,
    images_dir: PathBuf,
    max_upload_bytes: usize,
}

impl UsersInfo {
    /// Wire the module. Relative paths in `cfg` are resolved under `home_dir`.
    pub fn init(cfg: UsersInfoConfig, home_dir: &Path) -> anyhow::Result<Self> {
        info!("Initializing users_info module");

        let data_file = resolve_under(home_dir, &cfg.data_file);
        let images_dir = resolve_under(home_dir, &cfg.images_dir);
        debug!(
            "Loaded users_info config: data_file={}, images_dir={}, default_image={}, max_upload_mb={}",
            data_file.display(),
            images_dir.display(),
            cfg.default_image,
            cfg.max_upload_mb
        );

        if cfg.default_image.trim().is_empty() {
            anyhow::bail!("users_info.default_image must not be empty");
        }

        let repo = JsonFileUsersRepository::new(&data_file, cfg.default_image.clone());
        let images = FsImageStore::new(&images_dir);
        let service = Service::new(
            Arc::new(repo),
            Arc::new(images),
            ServiceConfig {
                default_image: cfg.default_image,
            },
        );

        Ok(Self {
            service: Arc::new(service),
            data_file,
            images_dir,
            max_upload_bytes: cfg.max_upload_mb.saturating_mul(1024 * 1024),
        })
    }

    pub fn service(&self) -> Arc<Service> {
        self.service.clone()
    }

    /// In-process client for other modules.
    pub fn client(&self) -> Arc<dyn UsersInfoApi> {
        Arc::new(UsersInfoLocalClient::new(self.service.clone()))
    }

    pub fn data_file(&self) -> &Path {
        &self.data_file
    }

    pub fn images_dir(&self) -> &Path {
        &self.images_dir
    }

    /// HTML pages, the JSON API and `/images` static files.
    pub fn router(&self) -> anyhow::Result<Router> {
        info!("Registering users_info routes");

        let views = web::views::Views::new()?;
        let state = Arc::new(web::handlers::WebState {
            service: self.service.clone(),
            views,
        });

        let router = web::routes::register_routes(Router::new(), state, self.max_upload_bytes);
        let router = rest::routes::register_routes(router, self.service.clone());
        let router = router.nest_service(
            web::views::IMAGES_ROUTE,
            ServeDir::new(&self.images_dir),
        );

        info!("Users routes registered successfully");
        Ok(router)
    }
}
