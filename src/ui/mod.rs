pub mod grid_viewer;

pub use grid_viewer::EguiGridPresenter;
