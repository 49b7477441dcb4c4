pub(crate) mod modernbert;
