//! Error types for the backdrop and the content API.

use std::fmt;

/// Errors that can occur during GPU initialization.
#[derive(Debug)]
pub enum GpuError {
    /// Failed to create a surface for rendering.
    SurfaceCreation(wgpu::CreateSurfaceError),
    /// No compatible GPU adapter found.
    NoAdapter,
    /// Failed to create GPU device.
    DeviceCreation(wgpu::RequestDeviceError),
}

impl fmt::Display for GpuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GpuError::SurfaceCreation(e) => write!(f, "Failed to create GPU surface: {}", e),
            GpuError::NoAdapter => write!(f, "No compatible GPU adapter found. Ensure your system has a GPU with Vulkan/Metal/DX12 support."),
            GpuError::DeviceCreation(e) => write!(f, "Failed to create GPU device: {}", e),
        }
    }
}

impl std::error::Error for GpuError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GpuError::SurfaceCreation(e) => Some(e),
            GpuError::DeviceCreation(e) => Some(e),
            GpuError::NoAdapter => None,
        }
    }
}

impl From<wgpu::CreateSurfaceError> for GpuError {
    fn from(e: wgpu::CreateSurfaceError) -> Self {
        GpuError::SurfaceCreation(e)
    }
}

impl From<wgpu::RequestDeviceError> for GpuError {
    fn from(e: wgpu::RequestDeviceError) -> Self {
        GpuError::DeviceCreation(e)
    }
}

/// Errors that can occur while running the backdrop.
#[derive(Debug)]
pub enum BackdropError {
    /// Failed to create the event loop.
    EventLoop(winit::error::EventLoopError),
    /// Failed to create the window.
    Window(winit::error::OsError),
    /// GPU initialization failed.
    Gpu(GpuError),
}

impl fmt::Display for BackdropError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackdropError::EventLoop(e) => write!(f, "Failed to create event loop: {}", e),
            BackdropError::Window(e) => write!(f, "Failed to create window: {}", e),
            BackdropError::Gpu(e) => write!(f, "GPU error: {}", e),
        }
    }
}

impl std::error::Error for BackdropError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BackdropError::EventLoop(e) => Some(e),
            BackdropError::Window(e) => Some(e),
            BackdropError::Gpu(e) => Some(e),
        }
    }
}

impl From<winit::error::EventLoopError> for BackdropError {
    fn from(e: winit::error::EventLoopError) -> Self {
        BackdropError::EventLoop(e)
    }
}

impl From<winit::error::OsError> for BackdropError {
    fn from(e: winit::error::OsError) -> Self {
        BackdropError::Window(e)
    }
}

impl From<GpuError> for BackdropError {
    fn from(e: GpuError) -> Self {
        BackdropError::Gpu(e)
    }
}

/// Errors that can occur while serving the content API.
#[derive(Debug)]
pub enum ApiError {
    /// Failed to bind the listen address.
    Bind(String),
    /// Failed to read a request body or write a response.
    Io(std::io::Error),
    /// An upstream service call failed or returned an unusable payload.
    Upstream(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Bind(msg) => write!(f, "Failed to bind API listener: {}", msg),
            ApiError::Io(e) => write!(f, "API I/O error: {}", e),
            ApiError::Upstream(msg) => write!(f, "Upstream service error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ApiError::Bind(_) => None,
            ApiError::Io(e) => Some(e),
            ApiError::Upstream(_) => None,
        }
    }
}

impl From<std::io::Error> for ApiError {
    fn from(e: std::io::Error) -> Self {
        ApiError::Io(e)
    }
}
