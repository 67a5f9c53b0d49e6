// System adapters for the Airlog station

mod host_probe_impl;

pub use host_probe_impl::HostProbeImpl;
