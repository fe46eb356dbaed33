pub(crate) mod flow_dtos;
