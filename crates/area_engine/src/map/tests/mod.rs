//! Frame-level scenarios driving the area directory
