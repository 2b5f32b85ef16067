mod deadline;
mod driver;
mod wifi;
