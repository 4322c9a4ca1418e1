pub(crate) mod brain_store;
